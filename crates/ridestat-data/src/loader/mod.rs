//! Ride file discovery and CSV ingestion.
//!
//! Files are discovered in a single directory. Each `*.csv` file is mapped to
//! a service name (see [`service_name`]); only `Uber*` services are loaded by
//! [`DataLoader::load`]. Columns are located by header name, so both the
//! 2014 (`Date/Time,Lat,Lon,Base`) and 2015 (`Dispatching_base_num,Pickup_date,...`)
//! layouts are accepted.

mod summary;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use crate::dataset::{Dataset, SourceFile};
use crate::error::{DataError, Result};
use crate::record::Pickup;

pub use summary::{DatasetSummary, DateRange, FileDetails};

const TIMESTAMP_COLUMNS: [&str; 3] = ["Date/Time", "Pickup_date", "pickup_datetime"];
const LAT_COLUMNS: [&str; 2] = ["Lat", "lat"];
const LON_COLUMNS: [&str; 2] = ["Lon", "lon"];
const BASE_COLUMNS: [&str; 2] = ["Base", "Dispatching_base_num"];

const TIMESTAMP_FORMATS: [&str; 3] = ["%m/%d/%Y %H:%M:%S", "%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M"];

/// Options for [`DataLoader::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Month tokens such as `apr14`; empty loads every file.
    pub months: Vec<String>,
    /// Maximum rows read per file.
    pub sample_size: Option<usize>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_months<I, S>(mut self, months: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.months = months.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = Some(sample_size);
        self
    }

    fn selects(&self, service: &str) -> bool {
        if self.months.is_empty() {
            return true;
        }
        let name = service.to_lowercase().replace('_', "");
        self.months
            .iter()
            .any(|m| name.contains(&m.to_lowercase().replace('_', "")))
    }
}

/// Maps a ride file name to a service name.
///
/// # Example
///
/// ```
/// use ridestat_data::service_name;
///
/// assert_eq!(service_name("uber-raw-data-apr14.csv"), "Uber_apr_14");
/// assert_eq!(service_name("uber-raw-data-janjune-15.csv"), "Uber_JanJune_2015");
/// assert_eq!(service_name("other-Lyft_B02510.csv"), "Lyft_B02510");
/// assert_eq!(service_name("weather.csv"), "weather");
/// ```
pub fn service_name(file_name: &str) -> String {
    let stem = file_name.strip_suffix(".csv").unwrap_or(file_name);

    if file_name.contains("uber-raw-data") {
        if file_name.contains("janjune-15") {
            return "Uber_JanJune_2015".to_string();
        }
        let parts: Vec<&str> = stem.split('-').collect();
        if parts.len() < 4 {
            return "Uber_Other".to_string();
        }
        let last = parts[parts.len() - 1];
        // `apr14` splits into month and two-digit year.
        let split = last.find(|c: char| c.is_ascii_digit());
        return match split {
            Some(i) if i > 0 => format!("Uber_{}_{}", &last[..i], &last[i..]),
            _ => format!("Uber_{}_{}", parts[parts.len() - 2], last),
        };
    }

    if let Some(rest) = file_name.strip_prefix("other-") {
        return rest.strip_suffix(".csv").unwrap_or(rest).to_string();
    }

    stem.to_string()
}

/// Rows parsed from one source.
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    pub pickups: Vec<Pickup>,
    /// Rows dropped for a missing or unparseable timestamp.
    pub skipped: usize,
}

struct Columns {
    timestamp: usize,
    lat: Option<usize>,
    lon: Option<usize>,
    base: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord, source_file: &str) -> Result<Self> {
        let find = |names: &[&str]| headers.iter().position(|h| names.contains(&h));
        let timestamp = find(&TIMESTAMP_COLUMNS[..]).ok_or_else(|| DataError::MissingColumn {
            file: source_file.to_string(),
            column: "timestamp",
        })?;
        Ok(Self {
            timestamp,
            lat: find(&LAT_COLUMNS[..]),
            lon: find(&LON_COLUMNS[..]),
            base: find(&BASE_COLUMNS[..]),
        })
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn parse_coordinate(record: &StringRecord, index: Option<usize>) -> Option<f64> {
    index
        .and_then(|i| record.get(i))
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parses pickups from any CSV reader.
///
/// Reads at most `limit` data rows. Rows without a parseable timestamp are
/// counted in [`ParsedFile::skipped`]; a missing or non-numeric coordinate
/// leaves the location empty.
pub fn read_pickups<R: Read>(
    reader: R,
    service: &str,
    source_file: &str,
    limit: Option<usize>,
) -> Result<ParsedFile> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = Columns::locate(csv.headers()?, source_file)?;
    let service: Arc<str> = Arc::from(service);
    let source: Arc<str> = Arc::from(source_file);

    let mut parsed = ParsedFile::default();
    for (row, record) in csv.records().enumerate() {
        if limit.is_some_and(|max| row >= max) {
            break;
        }
        let record = record?;

        let Some(timestamp) = record.get(columns.timestamp).and_then(parse_timestamp) else {
            parsed.skipped += 1;
            continue;
        };

        let mut pickup = Pickup::new(timestamp).with_source(service.clone(), source.clone());
        pickup.lat = parse_coordinate(&record, columns.lat);
        pickup.lon = parse_coordinate(&record, columns.lon);
        pickup.base = columns
            .base
            .and_then(|i| record.get(i))
            .filter(|b| !b.is_empty())
            .map(str::to_string);
        parsed.pickups.push(pickup);
    }

    Ok(parsed)
}

/// Loader for a directory of ride CSV files.
#[derive(Debug, Clone)]
pub struct DataLoader {
    data_path: PathBuf,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new("data/raw")
    }
}

impl DataLoader {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Maps service names to CSV paths in the data directory.
    ///
    /// Paths are visited in sorted order; a later path with a colliding
    /// service name replaces the earlier one.
    pub fn available_files(&self) -> Result<BTreeMap<String, PathBuf>> {
        let mut entries: Vec<PathBuf> = fs::read_dir(&self.data_path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        entries.sort();

        let mut files = BTreeMap::new();
        for path in entries {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            files.insert(service_name(file_name), path.clone());
        }
        Ok(files)
    }

    /// Loads and enriches Uber pickups.
    ///
    /// Files that fail to read are logged and skipped. Returns
    /// [`DataError::NoData`] when no file could be loaded.
    pub fn load(&self, options: &LoadOptions) -> Result<Dataset> {
        let files = self.available_files()?;
        let mut pickups = Vec::new();
        let mut sources = Vec::new();

        for (service, path) in files
            .iter()
            .filter(|(name, _)| name.contains("Uber") && options.selects(name))
        {
            match self.load_file(service, path, options.sample_size) {
                Ok(parsed) => {
                    info!(
                        event = "load_file",
                        service = service.as_str(),
                        rows = parsed.pickups.len() as u64,
                        skipped = parsed.skipped as u64,
                        "Loaded ride file"
                    );
                    if parsed.skipped > 0 {
                        warn!(
                            service = service.as_str(),
                            skipped = parsed.skipped as u64,
                            "Skipped rows with unparseable timestamps"
                        );
                    }
                    sources.push(SourceFile {
                        service: service.clone(),
                        path: path.clone(),
                        rows: parsed.pickups.len(),
                        skipped: parsed.skipped,
                    });
                    pickups.extend(parsed.pickups);
                }
                Err(e) => {
                    warn!(service = service.as_str(), error = %e, "Failed to load ride file");
                }
            }
        }

        if sources.is_empty() {
            return Err(DataError::NoData(self.data_path.clone()));
        }

        debug!(total = pickups.len() as u64, "Enriching pickups");
        Ok(Dataset::with_sources(pickups, sources))
    }

    fn load_file(&self, service: &str, path: &Path, limit: Option<usize>) -> Result<ParsedFile> {
        let file = File::open(path)?;
        let source_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        read_pickups(file, service, source_file, limit)
    }

    /// Inventories every CSV file in the data directory.
    pub fn summary(&self) -> Result<DatasetSummary> {
        summary::summarize(&self.available_files()?)
    }
}

#[cfg(test)]
mod tests;
