//! End-to-end tests for the word decoder
//!
//! Randomized checks use a seeded StdRng so failures are reproducible.
//! The pipeline tests run emulator words through the text reader, the
//! decoder and the text writer, the same path the binaries take.

use std::io::Cursor;

use mesytec_decode::decoder::{decode, is_data, is_eoe, is_ext_ts, is_fill, is_header};
use mesytec_decode::emulator::{EmulatorConfig, EventEmulator};
use mesytec_decode::output::{OutputFormat, RecordWriter};
use mesytec_decode::reader::WordReader;
use mesytec_decode::RecordKind;
use rand::prelude::*;
use rand::rngs::StdRng;

const N_RANDOM_WORDS: usize = 200_000;

/// Random words biased towards every signature so each kind gets hit
fn random_words(seed: u64) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let signatures = [
        0x0000_0000u32,
        0x0400_0000,
        0x0480_0000,
        0x1000_0000,
        0x4000_0000,
        0xC000_0000,
    ];
    (0..N_RANDOM_WORDS)
        .map(|i| match i % 4 {
            0 => rng.gen(),
            1 => signatures[rng.gen_range(0..signatures.len())] | (rng.gen::<u32>() & 0x007F_FFFF),
            2 => signatures[rng.gen_range(0..signatures.len())],
            _ => rng.gen::<u32>() & 0x0FFF_FFFF,
        })
        .collect()
}

#[test]
fn reference_scenarios() {
    let cases = [
        (
            0x40010c07,
            RecordKind::ModuleHeader {
                module_id: 0x01,
                module_setting: 0x3,
                data_length: 7,
            },
        ),
        (
            0x10100868,
            RecordKind::DataWord {
                channel_address: 16,
                mdpp_flags: 0x0,
            },
        ),
        (
            0x1000036e,
            RecordKind::DataWord {
                channel_address: 0,
                mdpp_flags: 0x0,
            },
        ),
        (
            0x103002aa,
            RecordKind::DataWord {
                channel_address: 48,
                mdpp_flags: 0x0,
            },
        ),
        (
            0xc18d01bd,
            RecordKind::EndOfEvent {
                low_stamp: 26018237,
            },
        ),
        (0x00000000, RecordKind::FillWord),
        (
            0x04800057,
            RecordKind::ExtendedTimestamp { high_stamp: 0x0057 },
        ),
        (0x20000000, RecordKind::Unrecognized),
    ];

    for (word, expected) in cases {
        let record = decode(word);
        assert_eq!(record.word, word);
        assert_eq!(record.kind, expected, "word 0x{:08x}", word);
    }
}

#[test]
fn decode_is_deterministic() {
    for word in random_words(1) {
        assert_eq!(decode(word), decode(word));
    }
}

#[test]
fn decode_follows_priority_order() {
    for word in random_words(2) {
        let expected = if is_header(word) {
            "module_header"
        } else if is_data(word) {
            "data_word"
        } else if is_ext_ts(word) {
            "extended_ts"
        } else if is_eoe(word) {
            "end_of_event"
        } else if is_fill(word) {
            "fill_word"
        } else {
            "unrecognized"
        };
        let record = decode(word);
        assert_eq!(record.word, word);
        assert_eq!(record.kind.label(), expected, "word 0x{:08x}", word);
    }
}

#[test]
fn known_signatures_never_overlap() {
    for word in random_words(3) {
        let matches = [
            is_header(word),
            is_data(word),
            is_ext_ts(word),
            is_eoe(word),
            is_fill(word),
        ]
        .iter()
        .filter(|&&m| m)
        .count();
        assert!(matches <= 1, "word 0x{:08x} matches {} patterns", word, matches);
    }
}

#[test]
fn fields_come_from_their_own_bits() {
    for word in random_words(4) {
        match decode(word).kind {
            RecordKind::ModuleHeader {
                module_id,
                module_setting,
                data_length,
            } => {
                assert_eq!(module_id as u32, (word >> 16) & 0xFF);
                assert_eq!(module_setting as u32, (word >> 10) & 0x3F);
                assert_eq!(data_length as u32, word & 0x3FF);
            }
            RecordKind::DataWord {
                channel_address,
                mdpp_flags,
            } => {
                assert_eq!(channel_address as u32, (word >> 16) & 0x3F);
                assert_eq!(mdpp_flags, ((word & 0x0FC0_0000) >> 18) as u8);
            }
            RecordKind::ExtendedTimestamp { high_stamp } => {
                assert_eq!(high_stamp as u32, word & 0xFFFF);
            }
            RecordKind::EndOfEvent { low_stamp } => {
                assert_eq!(low_stamp, word & 0x3FFF_FFFF);
            }
            RecordKind::FillWord => assert_eq!(word, 0),
            RecordKind::Unrecognized => {}
        }
    }
}

#[test]
fn boundary_words() {
    assert!(matches!(decode(0x3FFF_FFFF).kind, RecordKind::Unrecognized));
    assert!(matches!(decode(0x4000_0000).kind, RecordKind::ModuleHeader { .. }));
    assert!(matches!(decode(0x7FFF_FFFF).kind, RecordKind::ModuleHeader { .. }));
    assert!(matches!(decode(0x8000_0000).kind, RecordKind::Unrecognized));
    assert!(matches!(decode(0xBFFF_FFFF).kind, RecordKind::Unrecognized));
    assert!(matches!(decode(0xC000_0000).kind, RecordKind::EndOfEvent { low_stamp: 0 }));
    assert!(matches!(decode(0x1FFF_FFFF).kind, RecordKind::DataWord { .. }));
    assert!(matches!(decode(0x047F_FFFF).kind, RecordKind::DataWord { .. }));
    assert!(matches!(decode(0x04FF_FFFF).kind, RecordKind::ExtendedTimestamp { .. }));
    assert!(matches!(decode(0x0000_0001).kind, RecordKind::Unrecognized));
}

#[test]
fn emulator_words_survive_text_round_trip() {
    let mut emulator = EventEmulator::new(EmulatorConfig {
        seed: Some(2024),
        extended_ts: true,
        pad_to_even: true,
        ..Default::default()
    })
    .expect("valid config");
    let words = emulator.generate(200);

    let text: String = words.iter().map(|w| format!("0x{:08x}\n", w)).collect();
    let mut reader = WordReader::new(Cursor::new(text.into_bytes()));
    let read_back: Vec<u32> = reader.by_ref().map(|w| w.expect("read word")).collect();
    assert_eq!(read_back, words);
    assert!(reader.stopped_at().is_none());

    let mut writer = RecordWriter::new(Vec::new(), OutputFormat::Text);
    for &word in &read_back {
        writer.write(&decode(word)).expect("write record");
    }
    let (out, tally) = writer.finish().expect("finish");

    assert_eq!(tally.total as usize, words.len());
    assert_eq!(tally.module_header, 200);
    assert_eq!(tally.extended_ts, 200);
    assert_eq!(tally.end_of_event, 200);
    assert_eq!(tally.unrecognized, 0);
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), words.len());
}

#[test]
fn emulator_events_are_self_consistent() {
    let mut emulator = EventEmulator::new(EmulatorConfig {
        seed: Some(99),
        module_id: 0x2a,
        channels: 32,
        mean_hits: 8.0,
        ..Default::default()
    })
    .expect("valid config");

    for _ in 0..500 {
        let words = emulator.next_event();
        let kinds: Vec<RecordKind> = words.iter().map(|&w| decode(w).kind).collect();

        let RecordKind::ModuleHeader {
            module_id,
            data_length,
            ..
        } = kinds[0]
        else {
            panic!("event must start with a header, got {:?}", kinds[0]);
        };
        assert_eq!(module_id, 0x2a);
        assert_eq!(data_length as usize, words.len() - 1);

        let n_data = kinds
            .iter()
            .filter(|k| matches!(k, RecordKind::DataWord { .. }))
            .count();
        assert_eq!(n_data, words.len() - 2);
        assert!(n_data <= 32);
    }
}
