//! Shared infrastructure for the mesytec tools
//!
//! Error types and CLI argument structs used by both binaries.

pub mod cli;
pub mod error;

pub use cli::{CommonArgs, DecodeArgs, EmulatorArgs};
pub use error::{DecodeToolError, ToolResult};
