//! RideStat - A/B testing for ride-hailing pickup data
//!
//! Load raw pickup files, group them into treatment and control cohorts and
//! test whether the cohorts differ in pickups per day or per hour.
//!
//! # Example
//!
//! ```rust
//! use ridestat::prelude::*;
//!
//! let dir = ridestat_test::april_2014_dir();
//! let config = StudyConfig::new()
//!     .with_data_path(dir.path())
//!     .with_correction(CorrectionMethod::Holm);
//!
//! let report = ridestat::run_study(&config, &[]).unwrap();
//! assert_eq!(report.outcomes.len(), 2);
//! assert!(report.outcome("friday_night").unwrap().significant);
//! ```

// Statistics
pub use ridestat_core::{
    achieved_power, adjust, one_sample, required_sample_size, two_sample, Alternative,
    BootstrapConfig, BootstrapInterval, ConfidenceInterval, CorrectionMethod, EffectSize,
    StatsError, Summary, TTestKind, TTestResult,
};

// Data loading
pub use ridestat_data::{
    Borough, DataError, DataLoader, Dataset, DatasetSummary, EnrichedPickup, LoadOptions, Pickup,
    PickupFeatures,
};

// Study files
pub use ridestat_config::{
    AggregationUnit, AnalysisConfig, CohortConfig, ConfigError, CustomExperimentConfig, DataConfig,
    ExperimentConfig, HourRange, StudyConfig,
};

// Experiments
pub use ridestat_engine::{
    evaluate, Cohort, CohortSpec, EngineError, Experiment, ExperimentFailure, ExperimentOutcome,
    RunStatistics, StudyReport, StudyRunner, UnitKey, BUILT_IN,
};

// Reports
pub use ridestat_report::{CsvExporter, JsonReport, MarkdownReport, ReportError};

#[cfg(feature = "console")]
pub use ridestat_console as console;

mod study;
pub use study::{experiments_for, load_dataset, run_study, run_study_with_channel};

pub mod prelude {
    pub use super::{
        AggregationUnit, AnalysisConfig, CohortSpec, CorrectionMethod, Dataset, Experiment,
        ExperimentOutcome, StudyConfig, StudyReport, StudyRunner,
    };
    pub use super::{CsvExporter, JsonReport, MarkdownReport};
}
