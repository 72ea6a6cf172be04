//! mesytec-emulator - prints synthetic mesytec event words, one per line
//!
//! Usage:
//!   mesytec-emulator                                  # Use defaults
//!   mesytec-emulator --config mesytec.toml            # Use config file
//!   mesytec-emulator -n 1000 --seed 7 --extended-ts   # Reproducible run
//!   mesytec-emulator -n 5 | mesytec-decode

use std::io::{self, BufWriter, Write};

use anyhow::Context;
use clap::Parser;
use mesytec_decode::common::EmulatorArgs;
use mesytec_decode::config::Config;
use mesytec_decode::emulator::{EmulatorConfig, EventEmulator};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("mesytec_decode=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    let args = EmulatorArgs::parse();

    let config_path = &args.common.config_file;
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("failed to load {}", config_path))?;

    // Command line flags override the config file
    let base = config.emulator;
    let emulator_config = EmulatorConfig {
        events: args.events.unwrap_or(base.events),
        module_id: args.module_id.unwrap_or(base.module_id),
        channels: args.channels.unwrap_or(base.channels),
        mean_hits: args.mean_hits.unwrap_or(base.mean_hits),
        extended_ts: args.extended_ts || base.extended_ts,
        pad_to_even: args.pad || base.pad_to_even,
        seed: args.seed.or(base.seed),
        ..base
    };

    let mut emulator =
        EventEmulator::new(emulator_config).context("invalid emulator settings")?;
    let n_events = emulator.config().events;

    let mut out = BufWriter::new(io::stdout().lock());
    let mut n_words = 0u64;
    for _ in 0..n_events {
        for word in emulator.next_event() {
            writeln!(out, "0x{:08x}", word)?;
            n_words += 1;
        }
    }
    out.flush()?;

    info!(
        events = emulator.events_generated(),
        words = n_words,
        "Emulation complete"
    );

    Ok(())
}
