//! Outbound connection establishment
//!
//! Dials a responder's listening socket and hands the established stream
//! back as a session.

use std::io;

use tokio::net::TcpSocket;

use wr_core::{Endpoint, SetupError};

use crate::session::Session;

/// Establishes the outbound connection to a responder
#[derive(Debug, Clone)]
pub struct Connector {
    target: Endpoint,
}

impl Connector {
    pub fn new(target: Endpoint) -> Self {
        Self { target }
    }

    /// Get the endpoint this connector dials
    pub fn target(&self) -> Endpoint {
        self.target
    }

    /// Attempt a single connection to the responder
    ///
    /// A refused connection maps to `SetupError::ConnectionRefused`, which
    /// carries the short operator-facing message; every other failure keeps
    /// its io source.
    pub async fn connect(&self) -> Result<Session, SetupError> {
        tracing::debug!("Connecting to {}", self.target);

        let socket = TcpSocket::new_v4().map_err(|source| SetupError::Connect {
            target: self.target,
            source,
        })?;
        socket
            .set_reuseaddr(true)
            .map_err(|source| SetupError::Connect {
                target: self.target,
                source,
            })?;

        let stream = socket
            .connect(self.target.socket_addr())
            .await
            .map_err(|source| {
                if source.kind() == io::ErrorKind::ConnectionRefused {
                    SetupError::ConnectionRefused {
                        target: self.target,
                    }
                } else {
                    SetupError::Connect {
                        target: self.target,
                        source,
                    }
                }
            })?;

        tracing::debug!("Connected to {}", self.target);
        Ok(Session::new(stream, self.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connect_refused_when_nothing_listens() {
        // bind then drop to get a port with no listener behind it
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let connector = Connector::new(Endpoint::new(Ipv4Addr::LOCALHOST, port));
        let err = connector.connect().await.unwrap_err();

        assert!(matches!(err, SetupError::ConnectionRefused { .. }));
        assert!(err.to_string().contains("Couldn't connect to"));
    }

    #[tokio::test]
    async fn test_connect_succeeds_against_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let connector = Connector::new(Endpoint::new(Ipv4Addr::LOCALHOST, port));
        let session = connector.connect().await.unwrap();

        assert_eq!(session.target().port(), port);
    }
}
