//! mesytec-decode - prints a description of each mesytec VME data word
//!
//! Usage:
//!   echo "0x40010c07 0x10100868 0xc18d01bd" | mesytec-decode
//!   mesytec-decode --format json run001.txt run002.txt
//!   mesytec-emulator -n 100 | mesytec-decode --summary
//!
//! Words may also be pasted into the terminal; each line is decoded as soon
//! as it is entered.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use mesytec_decode::common::DecodeArgs;
use mesytec_decode::config::Config;
use mesytec_decode::decoder::decode;
use mesytec_decode::output::RecordWriter;
use mesytec_decode::reader::WordReader;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr, decoded lines to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("mesytec_decode=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    let args = DecodeArgs::parse();

    let config_path = &args.common.config_file;
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("failed to load {}", config_path))?;
    if Path::new(config_path).exists() {
        info!(config_file = %config_path, "Loaded configuration");
    }

    let format = args.format.unwrap_or(config.output.format);
    let summary = args.summary || config.output.summary;
    let skip_unrecognized = args.skip_unrecognized || config.output.skip_unrecognized;
    let interactive = io::stdout().is_terminal();

    let mut writer = RecordWriter::new(BufWriter::new(io::stdout().lock()), format)
        .skip_unrecognized(skip_unrecognized);

    let inputs = if args.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        args.files.clone()
    };

    for path in &inputs {
        let input = open_input(path)?;
        let stopped_early = decode_stream(input, &mut writer, interactive)?;
        debug!(
            file = %path.display(),
            words = writer.tally().total,
            "Input finished"
        );
        if stopped_early {
            // A bad token ends the whole input, not just this file
            break;
        }
    }

    if summary {
        writer.write_summary()?;
    }
    let (_, tally) = writer.finish()?;
    debug!(words = tally.total, "Done");

    Ok(())
}

/// Open a file, or stdin for "-"
fn open_input(path: &Path) -> anyhow::Result<Box<dyn BufRead>> {
    if path == Path::new("-") {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    info!(file = %path.display(), "Reading input file");
    Ok(Box::new(BufReader::new(file)))
}

/// Decode every word of one input. Returns true if a bad token ended it.
fn decode_stream<W: Write>(
    input: Box<dyn BufRead>,
    writer: &mut RecordWriter<W>,
    flush_each: bool,
) -> anyhow::Result<bool> {
    let mut reader = WordReader::new(input);
    for word in reader.by_ref() {
        writer.write(&decode(word?))?;
        if flush_each {
            writer.flush()?;
        }
    }
    Ok(reader.stopped_at().is_some())
}
