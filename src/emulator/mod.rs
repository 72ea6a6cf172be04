//! Emulator - generates synthetic mesytec event blocks for testing
//!
//! Each event is laid out the way an MDPP module reads it out:
//!
//! ```text
//! module header   data_length = number of words that follow
//! [extended ts]   optional, upper 16 bits of the 46-bit timestamp
//! data word * N   one per hit channel, ascending channel order
//! end of event    lower 30 bits of the timestamp
//! [fill word]     optional padding to an even word count
//! ```
//!
//! Hit multiplicity is Poisson distributed; ADC values form a Gaussian peak
//! per channel (mean = 1000 + channel * 100, sigma = 50).

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Poisson};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::decoder::vme::{
    CHANNEL_ADDRESS_MASK, CHANNEL_ADDRESS_SHIFT, DATA_LENGTH_MASK, EOE_SIGNATURE,
    EXT_TS_SIGNATURE, HEADER_SIGNATURE, LOW_STAMP_MASK, MDPP_FLAGS_MASK, MDPP_SIGNATURE,
    MODULE_ID_SHIFT, MODULE_SETTING_MASK, MODULE_SETTING_SHIFT,
};

/// Highest channel count a data word can address (6-bit field)
pub const MAX_CHANNELS: u8 = 64;

/// Raw flag bit 0 sits at word bit 22
const FLAGS_WORD_SHIFT: u32 = 22;
/// Raw flag bit used to mark pileup in generated data
const FLAG_PILEUP: u8 = 0x01;
/// Low stamp width
const LOW_STAMP_BITS: u32 = 30;
/// Peak width of generated ADC values
const PEAK_SIGMA: f64 = 50.0;

/// Build a module header word
pub fn encode_header(module_id: u8, module_setting: u8, data_length: u16) -> u32 {
    HEADER_SIGNATURE
        | ((module_id as u32) << MODULE_ID_SHIFT)
        | (((module_setting as u32) << MODULE_SETTING_SHIFT) & MODULE_SETTING_MASK)
        | (data_length as u32 & DATA_LENGTH_MASK)
}

/// Build an MDPP data word
///
/// `flags` holds the six raw flag bits (word bits 22-27). The decoder
/// reports the low byte of `flags << 4`, so flag bits 4 and 5 are not visible.
pub fn encode_data_word(channel: u8, flags: u8, value: u16) -> u32 {
    MDPP_SIGNATURE
        | (((flags as u32) << FLAGS_WORD_SHIFT) & MDPP_FLAGS_MASK)
        | (((channel as u32) << CHANNEL_ADDRESS_SHIFT) & CHANNEL_ADDRESS_MASK)
        | value as u32
}

/// Build an extended timestamp word
pub fn encode_ext_ts(high_stamp: u16) -> u32 {
    EXT_TS_SIGNATURE | high_stamp as u32
}

/// Build an end-of-event word
pub fn encode_eoe(low_stamp: u32) -> u32 {
    EOE_SIGNATURE | (low_stamp & LOW_STAMP_MASK)
}

/// Emulator configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// Number of events to generate
    pub events: u64,
    /// Module ID written into each header
    pub module_id: u8,
    /// Module setting written into each header (6 bits)
    pub module_setting: u8,
    /// Channels hits are drawn from (1-64)
    pub channels: u8,
    /// Mean number of hits per event
    pub mean_hits: f64,
    /// Emit an extended timestamp word in each event
    pub extended_ts: bool,
    /// Append a fill word when an event has an odd word count
    pub pad_to_even: bool,
    /// RNG seed (random if not set)
    pub seed: Option<u64>,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            events: 10,
            module_id: 0,
            module_setting: 0,
            channels: 16,
            mean_hits: 4.0,
            extended_ts: false,
            pad_to_even: false,
            seed: None,
        }
    }
}

impl EmulatorConfig {
    /// Check parameter ranges
    pub fn validate(&self) -> Result<(), EmulatorError> {
        if self.channels == 0 {
            return Err(EmulatorError::NoChannels);
        }
        if self.channels > MAX_CHANNELS {
            return Err(EmulatorError::TooManyChannels(self.channels));
        }
        if self.module_setting as u32 > (MODULE_SETTING_MASK >> MODULE_SETTING_SHIFT) {
            return Err(EmulatorError::SettingOutOfRange(self.module_setting));
        }
        if !self.mean_hits.is_finite() || self.mean_hits < 0.0 {
            return Err(EmulatorError::InvalidMeanHits(self.mean_hits));
        }
        Ok(())
    }
}

/// Emulator errors
#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("channel count must be at least 1")]
    NoChannels,

    #[error("channel count {0} exceeds {max}", max = MAX_CHANNELS)]
    TooManyChannels(u8),

    #[error("module setting 0x{0:x} does not fit in 6 bits")]
    SettingOutOfRange(u8),

    #[error("mean hits per event must be a non-negative number, got {0}")]
    InvalidMeanHits(f64),

    #[error("distribution error: {0}")]
    Distribution(String),
}

/// Synthetic word source
pub struct EventEmulator {
    config: EmulatorConfig,
    rng: StdRng,
    multiplicity: Option<Poisson<f64>>,
    peaks: Vec<Normal<f64>>,
    timestamp: u64,
    events_generated: u64,
}

impl EventEmulator {
    /// Create a new emulator with the given configuration
    pub fn new(config: EmulatorConfig) -> Result<Self, EmulatorError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let multiplicity = if config.mean_hits > 0.0 {
            Some(
                Poisson::new(config.mean_hits)
                    .map_err(|e| EmulatorError::Distribution(e.to_string()))?,
            )
        } else {
            None
        };

        let peaks = (0..config.channels)
            .map(|ch| {
                Normal::new(1000.0 + ch as f64 * 100.0, PEAK_SIGMA)
                    .map_err(|e| EmulatorError::Distribution(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            module_id = config.module_id,
            channels = config.channels,
            mean_hits = config.mean_hits,
            seed = ?config.seed,
            "Emulator configured"
        );

        Ok(Self {
            config,
            rng,
            multiplicity,
            peaks,
            timestamp: 0,
            events_generated: 0,
        })
    }

    /// Validated settings this emulator runs with
    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn events_generated(&self) -> u64 {
        self.events_generated
    }

    /// Generate the words of one event, header first
    pub fn next_event(&mut self) -> Vec<u32> {
        let n_hits = match &self.multiplicity {
            Some(poisson) => {
                (poisson.sample(&mut self.rng) as usize).min(self.config.channels as usize)
            }
            None => 0,
        };

        let mut channels = index::sample(&mut self.rng, self.config.channels as usize, n_hits)
            .into_vec();
        channels.sort_unstable();

        self.timestamp += self.rng.gen_range(10..1000);

        let mut body = Vec::with_capacity(n_hits + 2);
        if self.config.extended_ts {
            body.push(encode_ext_ts((self.timestamp >> LOW_STAMP_BITS) as u16));
        }
        for ch in channels {
            let value = self.peaks[ch]
                .sample(&mut self.rng)
                .clamp(0.0, u16::MAX as f64) as u16;
            let flags = if self.rng.gen_ratio(1, 100) {
                FLAG_PILEUP
            } else {
                0
            };
            body.push(encode_data_word(ch as u8, flags, value));
        }
        body.push(encode_eoe(self.timestamp as u32));

        let mut words = Vec::with_capacity(body.len() + 2);
        words.push(encode_header(
            self.config.module_id,
            self.config.module_setting,
            body.len() as u16,
        ));
        words.extend(body);
        if self.config.pad_to_even && words.len() % 2 == 1 {
            words.push(0);
        }

        self.events_generated += 1;
        debug!(
            event = self.events_generated,
            hits = n_hits,
            words = words.len(),
            timestamp = self.timestamp,
            "Generated event"
        );

        words
    }

    /// Generate `n_events` events as one flat word sequence
    pub fn generate(&mut self, n_events: u64) -> Vec<u32> {
        let mut words = Vec::new();
        for _ in 0..n_events {
            words.extend(self.next_event());
        }
        words
    }
}
