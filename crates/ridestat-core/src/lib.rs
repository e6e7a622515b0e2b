//! RideStat Core - statistical primitives for A/B evaluation
//!
//! This crate provides the numeric building blocks used by the engine:
//! - Descriptive statistics and sample summaries
//! - Two-sample (Welch / Student) and one-sample t-tests
//! - Effect sizes (Cohen's d, Hedges' g, relative lift)
//! - Percentile bootstrap confidence intervals
//! - Multiple-testing correction
//! - Power and sample-size estimates
//!
//! All functions take `f64` slices and reject NaN / Inf input.
//!
//! # Example
//!
//! ```
//! use ridestat_core::{two_sample, Alternative, TTestKind};
//!
//! let friday = [412.0, 398.0, 455.0, 430.0];
//! let weekday = [301.0, 322.0, 298.0, 315.0, 307.0];
//!
//! let result = two_sample(&friday, &weekday, TTestKind::Welch, Alternative::TwoSided, 0.05).unwrap();
//! assert!(result.statistic > 0.0);
//! assert!(result.p_value < 0.05);
//! ```

pub mod bootstrap;
pub mod correction;
pub mod effect;
pub mod error;
pub mod power;
pub mod stats;
pub mod ttest;

#[cfg(test)]
mod ttest_tests;

pub use bootstrap::{BootstrapConfig, BootstrapInterval};
pub use correction::{adjust, CorrectionMethod};
pub use effect::EffectSize;
pub use error::{Result, StatsError};
pub use power::{achieved_power, required_sample_size};
pub use stats::Summary;
pub use ttest::{one_sample, two_sample, Alternative, ConfidenceInterval, TTestKind, TTestResult};
