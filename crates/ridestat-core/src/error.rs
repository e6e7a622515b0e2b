//! Error types for RideStat statistics

use thiserror::Error;

/// Error raised by statistical routines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// Input contained NaN or infinite values
    #[error("{name} contains NaN or Inf")]
    NonFinite { name: &'static str },

    /// Sample is too small for the requested statistic
    #[error("insufficient data in {name}: need at least {required} observations, got {actual}")]
    InsufficientData {
        name: &'static str,
        required: usize,
        actual: usize,
    },

    /// Both samples are constant, so the standard error is zero
    #[error("zero variance: standard error is zero")]
    ZeroVariance,

    /// A parameter is outside its valid domain
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Distribution construction failed
    #[error("distribution error: {0}")]
    Distribution(String),
}

/// Result type alias for statistical operations
pub type Result<T> = std::result::Result<T, StatsError>;
