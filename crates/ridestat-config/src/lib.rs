//! Configuration system for RideStat.
//!
//! A study file names the data to load, the analysis settings and the
//! experiments to run, so studies can be changed without code changes.
//!
//! # Examples
//!
//! Load a study from a TOML string:
//!
//! ```
//! use ridestat_config::{AggregationUnit, ExperimentConfig, StudyConfig};
//!
//! let config = StudyConfig::from_toml_str(r#"
//!     [data]
//!     path = "data/raw"
//!     months = ["apr14", "may14"]
//!
//!     [analysis]
//!     alpha = 0.01
//!     correction = "holm"
//!
//!     [[experiments]]
//!     type = "friday_night"
//!
//!     [[experiments]]
//!     type = "manhattan_brooklyn"
//!     unit = "day_hour"
//! "#).unwrap();
//!
//! assert_eq!(config.analysis.alpha, 0.01);
//! assert_eq!(config.experiments.len(), 2);
//! assert_eq!(config.experiments[1].unit(), AggregationUnit::DayHour);
//! assert!(matches!(config.experiments[0], ExperimentConfig::FridayNight(_)));
//! ```
//!
//! Use the default study when the file is missing:
//!
//! ```
//! use ridestat_config::StudyConfig;
//!
//! let config = StudyConfig::load("ridestat.toml").unwrap_or_default();
//! // Proceeds with defaults if the file doesn't exist
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use ridestat_core::{Alternative, BootstrapConfig, CorrectionMethod, TTestKind};
use ridestat_data::{Borough, LoadOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main study configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StudyConfig {
    /// Where and how much ride data to load.
    #[serde(default)]
    pub data: DataConfig,

    /// Settings shared by every experiment.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Experiments to evaluate, in report order.
    #[serde(default)]
    pub experiments: Vec<ExperimentConfig>,
}

impl StudyConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file.
    ///
    /// `.yaml` and `.yml` files are parsed as YAML, anything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist or cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the data directory.
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data.path = path.into();
        self
    }

    /// Caps the rows read per file.
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.data.sample_size = Some(sample_size);
        self
    }

    /// Sets the significance level.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.analysis.alpha = alpha;
        self
    }

    /// Sets the multiple-testing correction.
    pub fn with_correction(mut self, correction: CorrectionMethod) -> Self {
        self.analysis.correction = correction;
        self
    }

    /// Enables bootstrap intervals.
    pub fn with_bootstrap(mut self, bootstrap: BootstrapConfig) -> Self {
        self.analysis.bootstrap = Some(bootstrap);
        self
    }

    /// Adds an experiment.
    pub fn with_experiment(mut self, experiment: ExperimentConfig) -> Self {
        self.experiments.push(experiment);
        self
    }

    /// Checks value ranges that the file format cannot express.
    ///
    /// # Examples
    ///
    /// ```
    /// use ridestat_config::{ConfigError, StudyConfig};
    ///
    /// let config = StudyConfig::new().with_alpha(1.5);
    /// assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.data.validate()?;
        self.analysis.validate()?;
        for experiment in &self.experiments {
            experiment.validate()?;
        }
        Ok(())
    }
}

/// Data source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DataConfig {
    /// Directory holding the ride CSV files.
    pub path: PathBuf,

    /// Month tokens such as `apr14`; empty loads every file.
    pub months: Vec<String>,

    /// Maximum rows read per file.
    pub sample_size: Option<usize>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/raw"),
            months: Vec::new(),
            sample_size: None,
        }
    }
}

impl DataConfig {
    /// Loader options for this configuration.
    pub fn load_options(&self) -> LoadOptions {
        let options = LoadOptions::new().with_months(self.months.iter().cloned());
        match self.sample_size {
            Some(n) => options.with_sample_size(n),
            None => options,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_size == Some(0) {
            return Err(invalid("data.sample_size must be at least 1"));
        }
        Ok(())
    }
}

/// Statistical settings shared by every experiment.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AnalysisConfig {
    /// Significance level.
    pub alpha: f64,

    pub alternative: Alternative,

    /// Two-sample test variant.
    pub test: TTestKind,

    /// Correction applied across all experiments of a study.
    pub correction: CorrectionMethod,

    /// Target power for sample-size planning.
    pub power: f64,

    /// Bootstrap interval settings; `None` skips resampling.
    pub bootstrap: Option<BootstrapConfig>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            alternative: Alternative::TwoSided,
            test: TTestKind::Welch,
            correction: CorrectionMethod::None,
            power: 0.8,
            bootstrap: None,
        }
    }
}

impl AnalysisConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(invalid(format!(
                "analysis.alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if !(self.power > 0.0 && self.power < 1.0) {
            return Err(invalid(format!(
                "analysis.power must be in (0, 1), got {}",
                self.power
            )));
        }
        if let Some(bootstrap) = &self.bootstrap {
            bootstrap
                .validate()
                .map_err(|e| invalid(format!("analysis.bootstrap: {e}")))?;
        }
        Ok(())
    }
}

/// Grain at which pickups are counted into observations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationUnit {
    /// One observation per calendar date.
    #[default]
    Day,

    /// One observation per date and hour.
    DayHour,
}

impl FromStr for AggregationUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "day_hour" | "day-hour" | "hour" => Ok(Self::DayHour),
            _ => Err(invalid(format!(
                "unit must be 'day' or 'day_hour', got '{s}'"
            ))),
        }
    }
}

impl fmt::Display for AggregationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::DayHour => write!(f, "day_hour"),
        }
    }
}

/// Experiment configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExperimentConfig {
    /// Rainy dates against clear dates.
    RainyClear(RainyClearConfig),

    /// Friday evenings against Monday–Thursday evenings.
    FridayNight(UnitConfig),

    /// Manhattan against Brooklyn.
    ManhattanBrooklyn(UnitConfig),

    /// Cohorts declared in the file.
    Custom(CustomExperimentConfig),
}

impl ExperimentConfig {
    /// Name the experiment reports under.
    pub fn name(&self) -> &str {
        match self {
            Self::RainyClear(_) => "rainy_clear",
            Self::FridayNight(_) => "friday_night",
            Self::ManhattanBrooklyn(_) => "manhattan_brooklyn",
            Self::Custom(custom) => &custom.name,
        }
    }

    pub fn unit(&self) -> AggregationUnit {
        match self {
            Self::RainyClear(c) => c.unit,
            Self::FridayNight(c) | Self::ManhattanBrooklyn(c) => c.unit,
            Self::Custom(c) => c.unit,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::RainyClear(c) => {
                if c.rainy_dates.is_empty() || c.clear_dates.is_empty() {
                    return Err(invalid(
                        "rainy_clear needs at least one rainy and one clear date",
                    ));
                }
                Ok(())
            }
            Self::FridayNight(_) | Self::ManhattanBrooklyn(_) => Ok(()),
            Self::Custom(c) => {
                if c.name.trim().is_empty() {
                    return Err(invalid("custom experiment needs a name"));
                }
                c.treatment.validate(&c.name, "treatment")?;
                c.control.validate(&c.name, "control")
            }
        }
    }
}

/// Settings for an experiment whose cohorts are fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct UnitConfig {
    pub unit: AggregationUnit,
}

/// Date labels for the weather experiment.
///
/// Dates are ISO strings (`"2014-04-01"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RainyClearConfig {
    pub rainy_dates: Vec<NaiveDate>,
    pub clear_dates: Vec<NaiveDate>,
    #[serde(default)]
    pub unit: AggregationUnit,
}

/// Experiment built from two declared cohorts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CustomExperimentConfig {
    pub name: String,
    pub treatment: CohortConfig,
    pub control: CohortConfig,
    #[serde(default)]
    pub unit: AggregationUnit,
}

/// Filters selecting one cohort. Empty filters select everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CohortConfig {
    /// Display label; defaults to a description of the filters.
    pub label: Option<String>,
    pub weekdays: Vec<Weekday>,
    pub hours: Option<HourRange>,
    pub boroughs: Vec<Borough>,
    pub dates: Vec<NaiveDate>,
}

impl CohortConfig {
    fn validate(&self, experiment: &str, role: &str) -> Result<(), ConfigError> {
        if let Some(hours) = self.hours {
            hours
                .validate()
                .map_err(|msg| invalid(format!("{experiment}.{role}.hours: {msg}")))?;
        }
        Ok(())
    }
}

/// Inclusive hour-of-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

impl HourRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: u32) -> bool {
        self.start <= hour && hour <= self.end
    }

    fn validate(&self) -> Result<(), String> {
        if self.end > 23 {
            return Err(format!("end hour {} is past 23", self.end));
        }
        if self.start > self.end {
            return Err(format!("start {} is after end {}", self.start, self.end));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}
