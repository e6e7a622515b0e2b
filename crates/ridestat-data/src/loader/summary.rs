//! Inventory of the ride files in a data directory.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use super::{read_pickups, service_name};
use crate::error::Result;

/// Rows sampled from the first file to estimate the date range.
const DATE_RANGE_SAMPLE_ROWS: usize = 1000;

/// Size and row count of one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDetails {
    pub path: PathBuf,
    /// Size in MiB, rounded to two decimals.
    pub size_mb: f64,
    /// Data rows (lines minus the header).
    pub rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Summary of every CSV file in a data directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_files: usize,
    pub file_details: BTreeMap<String, FileDetails>,
    pub total_records: usize,
    /// Range seen in the first rows of the first file; `None` if unreadable.
    pub date_range: Option<DateRange>,
    pub services: Vec<String>,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total files: {}", self.total_files)?;
        writeln!(f, "Total records: {}", self.total_records)?;
        match self.date_range {
            Some(range) => writeln!(f, "Date range: {} to {}", range.start, range.end)?,
            None => writeln!(f, "Date range: Unknown to Unknown")?,
        }
        write!(f, "Services: {}", self.services.join(", "))
    }
}

fn file_details(path: &Path) -> Result<FileDetails> {
    let bytes = fs::metadata(path)?.len();
    let size_mb = (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0;

    let mut lines = 0usize;
    for line in BufReader::new(File::open(path)?).lines() {
        line?;
        lines += 1;
    }

    Ok(FileDetails {
        path: path.to_path_buf(),
        size_mb,
        rows: lines.saturating_sub(1),
    })
}

fn sample_date_range(path: &Path) -> Result<Option<DateRange>> {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let parsed = read_pickups(
        File::open(path)?,
        &service_name(file_name),
        file_name,
        Some(DATE_RANGE_SAMPLE_ROWS),
    )?;

    let mut dates = parsed.pickups.iter().map(|p| p.timestamp.date());
    Ok(dates.next().map(|first| {
        let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        DateRange { start, end }
    }))
}

pub(super) fn summarize(files: &BTreeMap<String, PathBuf>) -> Result<DatasetSummary> {
    let mut summary = DatasetSummary {
        total_files: files.len(),
        file_details: BTreeMap::new(),
        total_records: 0,
        date_range: None,
        services: Vec::new(),
    };

    for (service, path) in files {
        match file_details(path) {
            Ok(details) => {
                summary.total_records += details.rows;
                summary.services.push(service.clone());
                summary.file_details.insert(service.clone(), details);
            }
            Err(e) => warn!(service = service.as_str(), error = %e, "Failed to inspect ride file"),
        }
    }

    if let Some(first) = files.values().next() {
        summary.date_range = sample_date_range(first).unwrap_or_else(|e| {
            warn!(path = %first.display(), error = %e, "Could not determine date range");
            None
        });
    }

    Ok(summary)
}
