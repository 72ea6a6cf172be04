//! VME word decoder for mesytec MDPP/MxDC modules
//!
//! Decodes single 32-bit words as described in the mesytec application note
//! AN001 "Using mesytec VME modules". Every word decodes on its own; no
//! state is carried between calls.
//!
//! # Word Layout
//!
//! | Kind         | Signature bits            | Payload                         |
//! |--------------|---------------------------|---------------------------------|
//! | Header       | `01xx xxxx ...`           | module id, setting, data length |
//! | Data (MDPP)  | `0001 xxxx ...`           | channel address, flags          |
//! | Data (MxDC)  | `0000 0100 0 ...`         | channel address, flags          |
//! | Extended TS  | `0000 0100 1 ...`         | high 16 timestamp bits          |
//! | End of event | `11xx xxxx ...`           | low 30 timestamp bits           |
//! | Fill         | all zero                  | none                            |

use super::common::{DecodedRecord, RecordKind};

mod constants {
    // Header
    pub const HEADER_SIGNATURE_MASK: u32 = 0xC000_0000;
    pub const HEADER_SIGNATURE: u32 = 0x4000_0000;
    pub const DATA_LENGTH_MASK: u32 = 0x0000_03FF;
    pub const MODULE_ID_MASK: u32 = 0x00FF_0000;
    pub const MODULE_ID_SHIFT: u32 = 16;
    pub const MODULE_SETTING_MASK: u32 = 0x0000_FC00;
    pub const MODULE_SETTING_SHIFT: u32 = 10;

    // Data word
    pub const MDPP_SIGNATURE_MASK: u32 = 0xF000_0000;
    pub const MDPP_SIGNATURE: u32 = 0x1000_0000;
    pub const MXDC_SIGNATURE_MASK: u32 = 0xFF80_0000;
    pub const MXDC_SIGNATURE: u32 = 0x0400_0000;
    pub const CHANNEL_ADDRESS_MASK: u32 = 0x003F_0000;
    pub const CHANNEL_ADDRESS_SHIFT: u32 = 16;
    pub const MDPP_FLAGS_MASK: u32 = 0x0FC0_0000;
    pub const MDPP_FLAGS_SHIFT: u32 = 18;
    pub const MDPP_FLAGS_BYTE: u32 = 0xFF;

    // Extended timestamp (shares the MxDC signature mask, bit 23 set)
    pub const EXT_TS_SIGNATURE: u32 = 0x0480_0000;
    pub const HIGH_STAMP_MASK: u32 = 0x0000_FFFF;

    // End of event
    pub const EOE_SIGNATURE_MASK: u32 = 0xC000_0000;
    pub const EOE_SIGNATURE: u32 = 0xC000_0000;
    pub const LOW_STAMP_MASK: u32 = 0x3FFF_FFFF;

    pub const FILL_WORD: u32 = 0x0000_0000;
}

// Shared with the word encoders in the emulator
pub(crate) use constants::{
    CHANNEL_ADDRESS_MASK, CHANNEL_ADDRESS_SHIFT, DATA_LENGTH_MASK, EOE_SIGNATURE,
    EXT_TS_SIGNATURE, HEADER_SIGNATURE, LOW_STAMP_MASK, MDPP_FLAGS_MASK, MDPP_SIGNATURE,
    MODULE_ID_SHIFT, MODULE_SETTING_MASK, MODULE_SETTING_SHIFT,
};

/// Module header signature
#[inline]
pub fn is_header(word: u32) -> bool {
    (word & constants::HEADER_SIGNATURE_MASK) == constants::HEADER_SIGNATURE
}

/// Data word signature (MDPP or MxDC layout)
#[inline]
pub fn is_data(word: u32) -> bool {
    (word & constants::MDPP_SIGNATURE_MASK) == constants::MDPP_SIGNATURE
        || (word & constants::MXDC_SIGNATURE_MASK) == constants::MXDC_SIGNATURE
}

/// Extended timestamp signature
#[inline]
pub fn is_ext_ts(word: u32) -> bool {
    (word & constants::MXDC_SIGNATURE_MASK) == constants::EXT_TS_SIGNATURE
}

/// Fill word (all bits zero)
#[inline]
pub fn is_fill(word: u32) -> bool {
    word == constants::FILL_WORD
}

/// End of event signature
#[inline]
pub fn is_eoe(word: u32) -> bool {
    (word & constants::EOE_SIGNATURE_MASK) == constants::EOE_SIGNATURE
}

/// Decode a single data word
///
/// Patterns are tested in the order header, data, extended timestamp,
/// end of event, fill. The first match wins and only its fields are
/// extracted. Words matching nothing become `RecordKind::Unrecognized`.
pub fn decode(word: u32) -> DecodedRecord {
    let kind = if is_header(word) {
        RecordKind::ModuleHeader {
            module_id: ((word & constants::MODULE_ID_MASK) >> constants::MODULE_ID_SHIFT) as u8,
            module_setting: ((word & constants::MODULE_SETTING_MASK)
                >> constants::MODULE_SETTING_SHIFT) as u8,
            data_length: (word & constants::DATA_LENGTH_MASK) as u16,
        }
    } else if is_data(word) {
        RecordKind::DataWord {
            channel_address: ((word & constants::CHANNEL_ADDRESS_MASK)
                >> constants::CHANNEL_ADDRESS_SHIFT) as u8,
            // Shifted flags span 10 bits; only the low byte is reported
            mdpp_flags: (((word & constants::MDPP_FLAGS_MASK) >> constants::MDPP_FLAGS_SHIFT)
                & constants::MDPP_FLAGS_BYTE) as u8,
        }
    } else if is_ext_ts(word) {
        RecordKind::ExtendedTimestamp {
            high_stamp: (word & constants::HIGH_STAMP_MASK) as u16,
        }
    } else if is_eoe(word) {
        RecordKind::EndOfEvent {
            low_stamp: word & constants::LOW_STAMP_MASK,
        }
    } else if is_fill(word) {
        RecordKind::FillWord
    } else {
        RecordKind::Unrecognized
    };

    DecodedRecord::new(word, kind)
}

/// Decode a batch of words, preserving order
pub fn decode_all(words: &[u32]) -> Vec<DecodedRecord> {
    words.iter().copied().map(decode).collect()
}
