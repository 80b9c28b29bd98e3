//! wr-protocol: Wire contract and byte-stream primitives for warren
//!
//! This crate defines the unframed byte protocol spoken between the
//! responder and the initiator: chunked receives with short-read message
//! boundaries, best-effort connection teardown, and the exact payload
//! shapes both profiles put on the wire.

pub mod stream;
pub mod wire;

pub use stream::{close_quietly, recv_all};
pub use wire::{COMMAND_CHUNK_SIZE, EXECUTE_HEADER, RESPONSE_CHUNK_SIZE, SUDO_REFUSAL};
