//! Common types for decoder module

use serde::{Deserialize, Serialize};

/// Classified contents of a single data word
///
/// Only the fields of the selected kind exist; a header word never carries
/// a channel address and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordKind {
    /// Start of an event block from one module
    ModuleHeader {
        /// Module ID (8 bits)
        module_id: u8,
        /// Module setting (6 bits)
        module_setting: u8,
        /// Number of words following the header (10 bits)
        data_length: u16,
    },
    /// One channel sample (MDPP or MxDC layout)
    DataWord {
        /// Channel address (6 bits)
        channel_address: u8,
        /// Module specific flag bits: word bits 22-25 at bits 4-7
        mdpp_flags: u8,
    },
    /// High-order timestamp bits
    #[serde(rename = "extended_ts")]
    ExtendedTimestamp {
        /// Upper 16 timestamp bits
        high_stamp: u16,
    },
    /// End of an event block
    EndOfEvent {
        /// Lower 30 timestamp bits (or event counter)
        low_stamp: u32,
    },
    /// Padding word
    FillWord,
    /// Matches none of the known patterns
    Unrecognized,
}

impl RecordKind {
    /// Short name used in text and JSON output
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::ModuleHeader { .. } => "module_header",
            RecordKind::DataWord { .. } => "data_word",
            RecordKind::ExtendedTimestamp { .. } => "extended_ts",
            RecordKind::EndOfEvent { .. } => "end_of_event",
            RecordKind::FillWord => "fill_word",
            RecordKind::Unrecognized => "unrecognized",
        }
    }

    /// True for words matching no known pattern
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, RecordKind::Unrecognized)
    }
}

/// One decoded data word
///
/// The raw word is always kept for display and traceability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecodedRecord {
    /// Raw 32-bit word as read from the module
    pub word: u32,
    /// Classification and extracted fields
    #[serde(flatten)]
    pub kind: RecordKind,
}

impl DecodedRecord {
    /// Pair a raw word with its classification
    pub fn new(word: u32, kind: RecordKind) -> Self {
        Self { word, kind }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())?;
        match *self {
            RecordKind::ModuleHeader {
                module_id,
                module_setting,
                data_length,
            } => write!(
                f,
                ", module_id=0x{:02x}, module_setting=0x{:x}, data_length={} words",
                module_id, module_setting, data_length
            ),
            RecordKind::DataWord {
                channel_address,
                mdpp_flags,
            } => write!(
                f,
                ", channel_address={:2}, mdpp_flags=0x{:x}",
                channel_address, mdpp_flags
            ),
            RecordKind::ExtendedTimestamp { high_stamp } => {
                write!(f, ", high_stamp={}", high_stamp)
            }
            RecordKind::EndOfEvent { low_stamp } => write!(f, ", low_stamp={}", low_stamp),
            RecordKind::FillWord | RecordKind::Unrecognized => Ok(()),
        }
    }
}

impl std::fmt::Display for DecodedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08x} {}", self.word, self.kind)
    }
}
