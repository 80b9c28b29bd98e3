//! Core error types for warren

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::types::Endpoint;

/// Fatal errors while standing up either role.
///
/// The common cases carry their own variants so the operator-facing
/// message can name them; everything else stays generic.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The listening port is already bound by another process
    #[error("{addr} already in use")]
    PortInUse { addr: SocketAddr },

    /// Any other bind or listen failure
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The target actively refused the connection
    #[error("Couldn't connect to {target}")]
    ConnectionRefused { target: Endpoint },

    /// Any other connect failure
    #[error("Failed to connect to {target}: {source}")]
    Connect {
        target: Endpoint,
        #[source]
        source: io::Error,
    },
}

/// Failures from one command invocation.
///
/// Rendered with `to_string` when the text is sent to the peer in place of
/// command output; the variants are the taxonomy, the display text is the
/// wire payload.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Command was empty after trimming whitespace
    #[error("command is empty")]
    Empty,

    /// The host shell could not be launched
    #[error("Failed to run command: {0}")]
    Launch(#[from] io::Error),

    /// The command outlived the configured timeout and was killed
    #[error("Command timed out after {}s", .limit.as_secs())]
    TimedOut { limit: Duration },
}
