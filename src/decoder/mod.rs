//! Decoder module for mesytec VME data words
//!
//! Converts single 32-bit words from MDPP/MxDC modules into DecodedRecord.

pub mod common;
pub mod vme;

pub use common::{DecodedRecord, RecordKind};
pub use vme::{decode, decode_all, is_data, is_eoe, is_ext_ts, is_fill, is_header};
