//! Listening socket and accept loop

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

use wr_core::{Profile, ResponderConfig, SetupError};
use wr_protocol::close_quietly;

use crate::executor::CommandExecutor;
use crate::handler::{handle_execute, handle_shell, ResponderEvent};
use crate::registry::ConnectionRegistry;

const LISTEN_BACKLOG: u32 = 1024;

/// The listening role: binds a socket, accepts connections, and spawns a
/// handler task per connection according to the configured profile
pub struct Responder {
    config: ResponderConfig,
    identity: String,
    registry: Arc<ConnectionRegistry>,
    executor: CommandExecutor,
    limiter: Option<Arc<Semaphore>>,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<ResponderEvent>,
}

impl Responder {
    pub fn new(
        config: ResponderConfig,
        cancel: CancellationToken,
        event_tx: mpsc::Sender<ResponderEvent>,
    ) -> Self {
        let identity = config.effective_identity();
        let executor = CommandExecutor::new(config.command_timeout);
        let limiter = config
            .max_connections
            .map(|limit| Arc::new(Semaphore::new(limit)));

        Self {
            config,
            identity,
            registry: Arc::new(ConnectionRegistry::new()),
            executor,
            limiter,
            cancel,
            event_tx,
        }
    }

    /// Accept connections until the cancellation token fires, then close
    /// everything that is still registered.
    ///
    /// Setup failures (the port is taken, the socket cannot be created)
    /// are returned before any connection is accepted.
    pub async fn run(&self) -> Result<(), SetupError> {
        let listener = self.bind()?;
        tracing::info!(
            "Listening on {} with {} profile",
            self.local_addr(),
            self.config.profile.name()
        );

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("Responder shutting down");
                    break;
                }
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => self.dispatch(stream, peer).await,
                        Err(e) => tracing::error!("Failed to accept connection: {}", e),
                    }
                }
            }
        }

        self.shutdown();
        Ok(())
    }

    /// Stop accepting and close every tracked connection. Safe to call
    /// more than once.
    pub fn shutdown(&self) {
        // signal first so handlers stop reading, then sweep the registry
        self.cancel.cancel();
        self.registry.close_all();
    }

    /// Connections accepted since startup, including ones already closed
    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    fn local_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.config.port))
    }

    fn bind(&self) -> Result<TcpListener, SetupError> {
        let addr = self.local_addr();
        let socket = TcpSocket::new_v4().map_err(|source| SetupError::Bind { addr, source })?;
        socket
            .set_reuseaddr(true)
            .map_err(|source| SetupError::Bind { addr, source })?;
        socket.bind(addr).map_err(|source| {
            if source.kind() == io::ErrorKind::AddrInUse {
                SetupError::PortInUse { addr }
            } else {
                SetupError::Bind { addr, source }
            }
        })?;
        socket
            .listen(LISTEN_BACKLOG)
            .map_err(|source| SetupError::Bind { addr, source })
    }

    async fn dispatch(&self, stream: TcpStream, peer: SocketAddr) {
        let permit = match &self.limiter {
            Some(semaphore) => match Arc::clone(semaphore).try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    tracing::warn!("Connection limit reached, rejecting {}", peer);
                    close_quietly(stream).await;
                    return;
                }
            },
            None => None,
        };

        let conn = self.registry.register(peer, &self.cancel);
        tracing::info!("New connection {} from {}", conn.id, peer);
        let _ = self
            .event_tx
            .send(ResponderEvent::Connected { peer })
            .await;

        let profile = self.config.profile.clone();
        let executor = self.executor.clone();
        let identity = self.identity.clone();
        let events = self.event_tx.clone();

        tokio::spawn(async move {
            let id = conn.id;
            let result = match profile {
                Profile::Execute(command) => {
                    handle_execute(stream, conn, executor, command, events).await
                }
                Profile::Shell => handle_shell(stream, conn, executor, identity, events).await,
            };
            match result {
                Ok(()) => tracing::debug!("Connection {} closed", id),
                Err(e) => tracing::warn!("Connection {} closed with error: {}", id, e),
            }
            drop(permit);
        });
    }
}
