//! Core domain types

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// A connection target: IPv4 address plus port.
///
/// Octet and port ranges are enforced by the field types, so a constructed
/// endpoint is always valid. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    addr: Ipv4Addr,
    port: u16,
}

impl Endpoint {
    /// Create a new endpoint
    pub fn new(addr: Ipv4Addr, port: u16) -> Self {
        Self { addr, port }
    }

    /// The IPv4 address
    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    /// The port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The endpoint as a socket address, for connect/bind calls
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.addr, self.port))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.addr, self.port)
    }
}

impl From<SocketAddrV4> for Endpoint {
    fn from(addr: SocketAddrV4) -> Self {
        Self::new(*addr.ip(), addr.port())
    }
}

/// Responder behavior for each accepted connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    /// Run one fixed command per connection, respond once, close
    Execute(String),
    /// Serve an interactive remote-command loop
    Shell,
}

impl Profile {
    /// Short name for logs and status output
    pub fn name(&self) -> &'static str {
        match self {
            Profile::Execute(_) => "execute",
            Profile::Shell => "shell",
        }
    }
}
