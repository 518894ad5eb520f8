//! Result aggregation and rendering.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use modfetch_core::{FetchError, FetchOutcome, Notice, OutcomeRecord};

/// Aggregated result of a download run.
///
/// `outcomes` holds exactly one entry per resolved module, in resolution
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Per-module outcomes in resolution order.
    pub outcomes: Vec<FetchOutcome>,
    /// Non-error diagnostics produced during resolution.
    pub notices: Vec<Notice>,
}

impl DownloadReport {
    /// Create a report.
    pub const fn new(outcomes: Vec<FetchOutcome>, notices: Vec<Notice>) -> Self {
        Self { outcomes, notices }
    }

    /// Whether any module failed. Drives the process exit status.
    pub fn failed(&self) -> bool {
        self.outcomes.iter().any(FetchOutcome::is_failed)
    }

    /// Number of failed modules.
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Per-module errors, in report order.
    pub fn errors(&self) -> impl Iterator<Item = &FetchError> {
        self.outcomes.iter().filter_map(|o| o.error.as_ref())
    }

    /// Output records, in report order.
    pub fn records(&self) -> Vec<OutcomeRecord> {
        self.outcomes.iter().map(FetchOutcome::to_record).collect()
    }

    /// Write one tab-indented JSON object per module.
    ///
    /// Objects are separated by newlines, not wrapped in an array.
    pub fn write_json<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for record in self.records() {
            let mut ser = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"\t"));
            record.serialize(&mut ser).map_err(io::Error::other)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }

    /// Write one line per failed module.
    pub fn write_errors<W: Write>(&self, mut writer: W, prefix: &str) -> io::Result<()> {
        for error in self.errors() {
            writeln!(writer, "{prefix}{error}")?;
        }
        writer.flush()
    }
}
