//! wr-initiator: The connecting role of the warren channel
//!
//! Dials a responder and exposes the established connection as a session
//! that sends operator commands and receives whatever the responder wrote
//! back. All interpretation of the bytes is left to the caller.

pub mod connector;
pub mod session;

pub use connector::Connector;
pub use session::Session;
