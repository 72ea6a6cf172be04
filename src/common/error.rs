//! Error types for the decode and emulator tools
//!
//! The word decoder itself cannot fail. Everything here belongs to the
//! surrounding I/O while reading words and writing records. Configuration
//! and emulator parameters have their own error types.

use thiserror::Error;

/// Errors raised by the tool pipeline around the decoder
#[derive(Error, Debug)]
pub enum DecodeToolError {
    /// I/O error (input stream, output stream, files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using DecodeToolError
pub type ToolResult<T> = Result<T, DecodeToolError>;
