//! Error types for experiment evaluation

use ridestat_config::ConfigError;
use ridestat_core::StatsError;
use ridestat_data::DataError;
use thiserror::Error;

/// Error raised while building or evaluating experiments.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// At least one pickup belongs to both cohorts
    #[error("{experiment}: {count} pickups fall in both '{treatment}' and '{control}'")]
    OverlappingCohorts {
        experiment: String,
        treatment: String,
        control: String,
        count: u64,
    },

    /// No built-in or configured experiment has this name
    #[error("unknown experiment '{name}'{}; available: {}", suggestion_hint(.suggestion), .available.join(", "))]
    UnknownExperiment {
        name: String,
        suggestion: Option<String>,
        available: Vec<String>,
    },
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
