//! CLI argument parsing for the mesytec tools
//!
//! Common arguments are shared via `#[command(flatten)]`; each binary has
//! its own Args struct embedding CommonArgs.

use std::path::PathBuf;

use clap::Parser;

use crate::output::OutputFormat;

/// Common arguments shared across both tools
#[derive(Parser, Debug, Clone)]
pub struct CommonArgs {
    /// Path to configuration file (ignored if it does not exist)
    #[arg(
        short = 'f',
        long = "config",
        env = "MESYTEC_DECODE_CONFIG",
        default_value = "mesytec.toml"
    )]
    pub config_file: String,
}

/// Arguments for the word decoder tool
#[derive(Parser, Debug, Clone)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Print per-kind word counts after the input ends
    #[arg(short = 's', long)]
    pub summary: bool,

    /// Do not print words matching no known pattern
    #[arg(long)]
    pub skip_unrecognized: bool,

    /// Input files, read in order ("-" or none means stdin)
    pub files: Vec<PathBuf>,
}

/// Arguments for the synthetic word emulator
#[derive(Parser, Debug, Clone)]
pub struct EmulatorArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Number of events to generate
    #[arg(short = 'n', long)]
    pub events: Option<u64>,

    /// RNG seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Module ID written into each header
    #[arg(short = 'm', long = "module-id")]
    pub module_id: Option<u8>,

    /// Number of channels to draw hits from (1-64)
    #[arg(short = 'c', long)]
    pub channels: Option<u8>,

    /// Mean number of hits per event
    #[arg(long = "mean-hits")]
    pub mean_hits: Option<f64>,

    /// Emit an extended timestamp word in each event
    #[arg(long = "extended-ts")]
    pub extended_ts: bool,

    /// Pad each event with a fill word to an even word count
    #[arg(long)]
    pub pad: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_args_default() {
        let args = CommonArgs::try_parse_from(["test"]).unwrap();
        assert_eq!(args.config_file, "mesytec.toml");
    }

    #[test]
    fn test_common_args_custom_config() {
        let args = CommonArgs::try_parse_from(["test", "-f", "custom.toml"]).unwrap();
        assert_eq!(args.config_file, "custom.toml");
    }

    #[test]
    fn test_decode_args_default() {
        let args = DecodeArgs::try_parse_from(["test"]).unwrap();
        assert_eq!(args.format, None);
        assert!(!args.summary);
        assert!(!args.skip_unrecognized);
        assert!(args.files.is_empty());
    }

    #[test]
    fn test_decode_args_full() {
        let args = DecodeArgs::try_parse_from([
            "test",
            "--config",
            "dec.toml",
            "--format",
            "json",
            "--summary",
            "--skip-unrecognized",
            "run001.txt",
            "-",
        ])
        .unwrap();
        assert_eq!(args.common.config_file, "dec.toml");
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert!(args.summary);
        assert!(args.skip_unrecognized);
        assert_eq!(
            args.files,
            vec![PathBuf::from("run001.txt"), PathBuf::from("-")]
        );
    }

    #[test]
    fn test_decode_args_rejects_unknown_format() {
        assert!(DecodeArgs::try_parse_from(["test", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_emulator_args_default() {
        let args = EmulatorArgs::try_parse_from(["test"]).unwrap();
        assert_eq!(args.events, None);
        assert_eq!(args.seed, None);
        assert_eq!(args.module_id, None);
        assert!(!args.extended_ts);
        assert!(!args.pad);
    }

    #[test]
    fn test_emulator_args_full() {
        let args = EmulatorArgs::try_parse_from([
            "test",
            "-n",
            "100",
            "--seed",
            "42",
            "-m",
            "3",
            "-c",
            "16",
            "--mean-hits",
            "2.5",
            "--extended-ts",
            "--pad",
        ])
        .unwrap();
        assert_eq!(args.events, Some(100));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.module_id, Some(3));
        assert_eq!(args.channels, Some(16));
        assert_eq!(args.mean_hits, Some(2.5));
        assert!(args.extended_ts);
        assert!(args.pad);
    }
}
