//! wr-responder: The listening role of the warren channel
//!
//! Binds a listening socket, accepts connections, and serves each one with
//! the configured profile: one-shot command execution or an interactive
//! remote-command loop. Tracks every accepted connection in a registry so
//! a coordinated shutdown can tear all of them down.

pub mod executor;
pub mod handler;
pub mod listener;
pub mod registry;

pub use executor::{CommandExecutor, ExecutionResult};
pub use handler::ResponderEvent;
pub use listener::Responder;
pub use registry::{ConnectionHandle, ConnectionId, ConnectionRegistry};
