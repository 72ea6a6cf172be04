//! Output - renders decoded records as text or JSON lines
//!
//! Text lines follow the layout of the mesytec reference decoder:
//! `0x<word> <kind>, <field>=<value>, ...`. JSON lines carry the same
//! fields as one object per record.

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::ToolResult;
use crate::decoder::{DecodedRecord, RecordKind};

/// Line format for decoded records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable text line
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Number of records seen per kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KindTally {
    pub total: u64,
    pub module_header: u64,
    pub data_word: u64,
    pub extended_ts: u64,
    pub end_of_event: u64,
    pub fill_word: u64,
    pub unrecognized: u64,
}

impl KindTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one record
    pub fn add(&mut self, kind: &RecordKind) {
        self.total += 1;
        let counter = match kind {
            RecordKind::ModuleHeader { .. } => &mut self.module_header,
            RecordKind::DataWord { .. } => &mut self.data_word,
            RecordKind::ExtendedTimestamp { .. } => &mut self.extended_ts,
            RecordKind::EndOfEvent { .. } => &mut self.end_of_event,
            RecordKind::FillWord => &mut self.fill_word,
            RecordKind::Unrecognized => &mut self.unrecognized,
        };
        *counter += 1;
    }
}

impl std::fmt::Display for KindTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "words={} module_header={} data_word={} extended_ts={} end_of_event={} fill_word={} unrecognized={}",
            self.total,
            self.module_header,
            self.data_word,
            self.extended_ts,
            self.end_of_event,
            self.fill_word,
            self.unrecognized
        )
    }
}

#[derive(Serialize)]
struct SummaryLine<'a> {
    summary: &'a KindTally,
}

/// Writes one line per decoded record and keeps a tally
pub struct RecordWriter<W: Write> {
    out: W,
    format: OutputFormat,
    skip_unrecognized: bool,
    tally: KindTally,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            skip_unrecognized: false,
            tally: KindTally::new(),
        }
    }

    /// Suppress output lines for unrecognized words
    pub fn skip_unrecognized(mut self, skip: bool) -> Self {
        self.skip_unrecognized = skip;
        self
    }

    /// Counts so far
    pub fn tally(&self) -> &KindTally {
        &self.tally
    }

    /// Render one record
    pub fn write(&mut self, record: &DecodedRecord) -> ToolResult<()> {
        self.tally.add(&record.kind);

        if self.skip_unrecognized && record.kind.is_unrecognized() {
            return Ok(());
        }

        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", record)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, record)?;
                writeln!(self.out)?;
            }
        }
        Ok(())
    }

    /// Render the per-kind counts as a final line
    pub fn write_summary(&mut self) -> ToolResult<()> {
        info!(
            words = self.tally.total,
            headers = self.tally.module_header,
            data = self.tally.data_word,
            unrecognized = self.tally.unrecognized,
            "Decode summary"
        );

        match self.format {
            OutputFormat::Text => writeln!(self.out, "summary: {}", self.tally)?,
            OutputFormat::Json => {
                serde_json::to_writer(
                    &mut self.out,
                    &SummaryLine {
                        summary: &self.tally,
                    },
                )?;
                writeln!(self.out)?;
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> ToolResult<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Flush and hand back the sink together with the final counts
    pub fn finish(mut self) -> ToolResult<(W, KindTally)> {
        self.out.flush()?;
        Ok((self.out, self.tally))
    }
}
