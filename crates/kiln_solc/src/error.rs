//! Error types for compiler invocation.

use std::path::PathBuf;

/// Errors raised while running the compiler or decoding its output.
#[derive(Debug, thiserror::Error)]
pub enum SolcError {
    /// The compiler process could not be started or fed its input.
    #[error("failed to run {path}: {source}")]
    Spawn {
        /// Path of the compiler executable.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The compiler process exited unsuccessfully.
    #[error("failed to compile: {stderr}")]
    Process {
        /// Standard error of the process.
        stderr: String,
    },

    /// The compiler reported diagnostics. Every message is kept.
    #[error("compilation failed with {} error(s):\n{}", .messages.len(), .messages.join("\n"))]
    Diagnostics {
        /// Formatted compiler messages, in reported order.
        messages: Vec<String>,
    },

    /// The compiler input or output was not valid JSON for the protocol.
    #[error("invalid compiler JSON: {reason}")]
    Json {
        /// Decoder message.
        reason: String,
    },
}
