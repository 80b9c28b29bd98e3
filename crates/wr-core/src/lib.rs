//! wr-core: Shared types, configuration, and error taxonomy for warren
//!
//! This crate provides the domain types, configuration structures, and
//! typed errors used by the responder, initiator, and CLI components.

pub mod config;
pub mod error;
pub mod types;

pub use config::ResponderConfig;
pub use error::{ExecError, SetupError};
pub use types::{Endpoint, Profile};
