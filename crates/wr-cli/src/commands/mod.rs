//! CLI command implementations

mod connect;
mod serve;

pub use connect::connect_command;
pub use serve::serve_command;
