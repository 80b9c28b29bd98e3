//! Connect command implementation

use std::io;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use wr_core::Endpoint;
use wr_initiator::{Connector, Session};

use crate::output::{self, print_error};

/// How the interactive loop ended
enum LoopEnd {
    /// Responder closed the connection
    Disconnected,
    /// Operator pressed Ctrl+C or closed stdin
    Interrupted,
}

/// Execute the connect command - dial the responder and relay operator
/// commands until one side stops
pub async fn connect_command(target: Endpoint) -> Result<()> {
    let mut session = Connector::new(target).connect().await?;

    let result = prompt_loop(&mut session).await;
    session.close().await;

    match result? {
        LoopEnd::Disconnected => print_error("Disconnected from target"),
        LoopEnd::Interrupted => print_error("Client terminated."),
    }

    Ok(())
}

/// Receive, display, prompt, send. The responder always speaks first, so
/// every iteration starts with a read.
async fn prompt_loop(session: &mut Session) -> io::Result<LoopEnd> {
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut first_response = true;

    loop {
        let response = tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(LoopEnd::Interrupted),
            response = session.recv_response() => response?,
        };
        if response.is_empty() {
            return Ok(LoopEnd::Disconnected);
        }

        output::print_response(&response, first_response);
        first_response = false;

        let command = loop {
            output::print_prompt();

            let mut line = String::new();
            let read = tokio::select! {
                _ = tokio::signal::ctrl_c() => return Ok(LoopEnd::Interrupted),
                read = stdin.read_line(&mut line) => read?,
            };
            if read == 0 {
                return Ok(LoopEnd::Interrupted);
            }

            let command = line.trim_end_matches(['\r', '\n']).to_string();
            if !command.is_empty() {
                break command;
            }
            // an empty send would look like a disconnect to the responder
        };

        session.send_command(command.as_bytes()).await?;
    }
}
