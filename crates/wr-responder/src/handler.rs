//! Per-connection handlers
//!
//! One handler task per accepted connection. Both profiles end the same
//! way: the stream is closed best-effort and a disconnect event is
//! emitted, whether the exchange finished cleanly or died on a transport
//! error.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use wr_protocol::wire::{execute_failure, execute_response, shell_banner, shell_response};
use wr_protocol::{close_quietly, recv_all, COMMAND_CHUNK_SIZE, SUDO_REFUSAL};

use crate::executor::CommandExecutor;
use crate::registry::ConnectionHandle;

/// Lifecycle notifications surfaced to whoever is running the responder
#[derive(Debug, Clone)]
pub enum ResponderEvent {
    Connected { peer: SocketAddr },
    Disconnected { peer: SocketAddr },
    CommandExecuted { peer: SocketAddr, command: String },
}

/// Serve one connection under the execute profile: run the configured
/// command, send the framed output, close.
pub(crate) async fn handle_execute<S>(
    mut stream: S,
    conn: Arc<ConnectionHandle>,
    executor: CommandExecutor,
    command: String,
    events: mpsc::Sender<ResponderEvent>,
) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    let result = run_execute(&mut stream, &conn, &executor, &command, &events).await;
    close_quietly(stream).await;
    let _ = events
        .send(ResponderEvent::Disconnected { peer: conn.peer })
        .await;
    result
}

async fn run_execute<S>(
    stream: &mut S,
    conn: &ConnectionHandle,
    executor: &CommandExecutor,
    command: &str,
    events: &mpsc::Sender<ResponderEvent>,
) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    // execution failures still get the header so the peer always sees a
    // well-formed response
    let response = match executor.execute(command).await {
        Ok(output) => {
            let _ = events
                .send(ResponderEvent::CommandExecuted {
                    peer: conn.peer,
                    command: command.to_string(),
                })
                .await;
            execute_response(&output.stdout, &output.stderr)
        }
        Err(e) => execute_failure(&e.to_string()),
    };

    stream.write_all(response.as_bytes()).await
}

/// Serve one connection under the shell profile: banner first, then a
/// command/response exchange until the peer disconnects or shutdown is
/// signalled.
pub(crate) async fn handle_shell<S>(
    mut stream: S,
    conn: Arc<ConnectionHandle>,
    executor: CommandExecutor,
    identity: String,
    events: mpsc::Sender<ResponderEvent>,
) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let result = shell_loop(&mut stream, &conn, &executor, &identity, &events).await;
    close_quietly(stream).await;
    let _ = events
        .send(ResponderEvent::Disconnected { peer: conn.peer })
        .await;
    result
}

async fn shell_loop<S>(
    stream: &mut S,
    conn: &ConnectionHandle,
    executor: &CommandExecutor,
    identity: &str,
    events: &mpsc::Sender<ResponderEvent>,
) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(shell_banner(identity).as_bytes()).await?;

    loop {
        // cancellation only prevents starting the next read; an exchange
        // already in flight runs to completion
        let received = tokio::select! {
            biased;
            _ = conn.cancel_token().cancelled() => return Ok(()),
            received = recv_all(stream, COMMAND_CHUNK_SIZE) => received?,
        };
        if received.is_empty() {
            return Ok(());
        }

        let command = String::from_utf8_lossy(&received);
        let response = if command.contains("sudo") {
            SUDO_REFUSAL.to_string()
        } else {
            match executor.execute(&command).await {
                Ok(output) => {
                    let _ = events
                        .send(ResponderEvent::CommandExecuted {
                            peer: conn.peer,
                            command: command.trim().to_string(),
                        })
                        .await;
                    shell_response(&output.stdout, &output.stderr)
                }
                Err(e) => e.to_string(),
            }
        };

        stream.write_all(response.as_bytes()).await?;
    }
}
