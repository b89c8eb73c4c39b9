//! Correlation dump records.
//!
//! One record is produced per accumulator dump read back over the bus. Records
//! are written either as whitespace-separated columns
//! (`dump_count I_E Q_E I_P Q_P I_L Q_L E_pow P_pow L_pow`) for offline
//! plotting, or as JSON lines.

use std::io::Write;

use serde::Serialize;

use crate::common::error::SimError;
use crate::common::signal::IqPair;

/// E/P/L correlator outputs of one dump.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CorrelationRecord {
    /// Channel that produced the dump.
    pub channel: usize,
    /// Per-channel dump sequence number, starting at 0.
    pub dump_count: u64,
    /// Early branch.
    pub early: IqPair,
    /// Prompt branch.
    pub prompt: IqPair,
    /// Late branch.
    pub late: IqPair,
}

impl CorrelationRecord {
    /// Returns the (early, prompt, late) powers.
    pub fn powers(&self) -> (i64, i64, i64) {
        (self.early.power(), self.prompt.power(), self.late.power())
    }

    /// Formats the record as one column line (no trailing newline).
    pub fn to_columns(&self) -> String {
        let (pe, pp, pl) = self.powers();
        format!(
            "{} {} {} {} {} {} {} {} {} {}",
            self.dump_count,
            self.early.i,
            self.early.q,
            self.prompt.i,
            self.prompt.q,
            self.late.i,
            self.late.q,
            pe,
            pp,
            pl
        )
    }
}

/// Output encoding of a [`DumpWriter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DumpFormat {
    /// Whitespace-separated columns.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Streams records to a writer.
#[derive(Debug)]
pub struct DumpWriter<W: Write> {
    out: W,
    format: DumpFormat,
    written: u64,
}

impl<W: Write> DumpWriter<W> {
    /// Wraps a writer.
    pub const fn new(out: W, format: DumpFormat) -> Self {
        Self {
            out,
            format,
            written: 0,
        }
    }

    /// Writes one record.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] or [`SimError::Json`] on failure.
    pub fn write(&mut self, record: &CorrelationRecord) -> Result<(), SimError> {
        match self.format {
            DumpFormat::Text => writeln!(self.out, "{}", record.to_columns())?,
            DumpFormat::Json => {
                serde_json::to_writer(&mut self.out, record)?;
                writeln!(self.out)?;
            }
        }
        self.written += 1;
        Ok(())
    }

    /// Returns the number of records written.
    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Flushes and returns the inner writer.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the flush fails.
    pub fn finish(mut self) -> Result<W, SimError> {
        self.out.flush()?;
        Ok(self.out)
    }
}
