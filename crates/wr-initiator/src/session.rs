//! Established connection to a responder

use std::io;

use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use wr_core::Endpoint;
use wr_protocol::{close_quietly, recv_all, RESPONSE_CHUNK_SIZE};

/// One established connection to a responder
///
/// Deliberately thin: commands go out as raw bytes and responses come
/// back as one accumulated message per exchange. An empty response means
/// the responder hung up.
#[derive(Debug)]
pub struct Session {
    stream: TcpStream,
    target: Endpoint,
}

impl Session {
    pub(crate) fn new(stream: TcpStream, target: Endpoint) -> Self {
        Self { stream, target }
    }

    pub fn target(&self) -> Endpoint {
        self.target
    }

    /// Send one operator command to the responder
    pub async fn send_command(&mut self, command: &[u8]) -> io::Result<()> {
        self.stream.write_all(command).await
    }

    /// Receive the responder's next message. Empty means disconnected.
    pub async fn recv_response(&mut self) -> io::Result<Bytes> {
        recv_all(&mut self.stream, RESPONSE_CHUNK_SIZE).await
    }

    /// Close the connection without surfacing shutdown errors
    pub async fn close(self) {
        close_quietly(self.stream).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::Connector;
    use std::net::Ipv4Addr;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_session_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut peer, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 64];
            let n = peer.read(&mut buf).await.unwrap();
            peer.write_all(&buf[..n]).await.unwrap();
        });

        let connector = Connector::new(Endpoint::new(Ipv4Addr::LOCALHOST, port));
        let mut session = connector.connect().await.unwrap();

        session.send_command(b"ping").await.unwrap();
        let response = session.recv_response().await.unwrap();
        assert_eq!(&response[..], b"ping");

        session.close().await;
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_recv_response_empty_when_peer_closes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (peer, _) = listener.accept().await.unwrap();
            drop(peer);
        });

        let connector = Connector::new(Endpoint::new(Ipv4Addr::LOCALHOST, port));
        let mut session = connector.connect().await.unwrap();
        server.await.unwrap();

        let response = session.recv_response().await.unwrap();
        assert!(response.is_empty());
    }
}
