//! mesytec-decode: decoder for mesytec VME module data words
//!
//! Classifies single 32-bit words from MDPP/MxDC modules (module header,
//! data word, extended timestamp, end of event, fill word) and renders them
//! as text or JSON lines.

pub mod common;
pub mod config;
pub mod decoder;
pub mod emulator;
pub mod output;
pub mod reader;

pub use decoder::{decode, DecodedRecord, RecordKind};
