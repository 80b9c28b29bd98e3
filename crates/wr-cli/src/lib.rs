//! warren: Command-line interface for the warren channel
//!
//! Provides the `warren` binary for both roles: the listening responder
//! and the interactive initiator.

pub mod commands;
pub mod output;
