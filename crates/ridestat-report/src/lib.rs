//! Study report export for RideStat.
//!
//! - [`CsvExporter`] - one row per experiment
//! - [`MarkdownReport`] - human-readable summary and per-experiment detail
//! - [`JsonReport`] - the full [`StudyReport`](ridestat_engine::StudyReport)
//!
//! Every exporter offers `to_string`, `to_file` and `write`.

mod error;
mod report;

pub use error::{ReportError, Result};
pub use report::{CsvExporter, JsonReport, MarkdownReport};

#[cfg(test)]
mod tests;
