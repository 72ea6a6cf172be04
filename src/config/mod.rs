//! Configuration module for the mesytec tools
//!
//! Loaded from an optional TOML file. Every field has a default, so an empty
//! file (or no file at all) is a valid configuration. Command line flags
//! override what is read here.
//!
//! # Example
//! ```toml
//! [output]
//! format = "json"
//! summary = true
//!
//! [emulator]
//! module_id = 3
//! channels = 16
//! mean_hits = 4.0
//! ```

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::emulator::EmulatorConfig;
use crate::output::OutputFormat;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Decoder output settings
    #[serde(default)]
    pub output: OutputConfig,
    /// Synthetic word generator settings
    #[serde(default)]
    pub emulator: EmulatorConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.emulator
            .validate()
            .map_err(|e| ConfigError::invalid("emulator", e.to_string()))
    }
}

/// Output settings for the decode tool
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Line format (text or json)
    pub format: OutputFormat,
    /// Print per-kind counts at end of input
    pub summary: bool,
    /// Suppress lines for unrecognized words (they are still counted)
    pub skip_unrecognized: bool,
}
