//! RideStat Engine - A/B evaluation of ride-pickup cohorts
//!
//! An experiment runs in three steps:
//! - [`cohort`] - grouping: which pickups and units belong to treatment and control
//! - [`aggregate`] - metric: pickup counts per day or day-hour unit
//! - [`evaluate`] - significance: t-test, effect sizes, bootstrap and power
//!
//! [`StudyRunner`] evaluates many experiments in parallel and applies a
//! multiple-testing correction across them.
//!
//! # Example
//!
//! ```
//! use ridestat_config::AnalysisConfig;
//! use ridestat_engine::{evaluate, Experiment};
//! use ridestat_test::pickups::april_2014;
//!
//! let outcome = evaluate(&april_2014(), &Experiment::friday_night(), &AnalysisConfig::default()).unwrap();
//! assert!(outcome.significant);
//! assert!(outcome.effect.cohens_d > 0.0);
//! ```

pub mod aggregate;
pub mod cohort;
pub mod error;
pub mod evaluate;
pub mod experiment;
pub mod runner;
pub mod statistics;

pub use aggregate::{aggregate, aggregate_pair, Aggregation, AggregationUnit, PairedAggregation, UnitKey};
pub use cohort::{Cohort, CohortSpec};
pub use error::{EngineError, Result};
pub use evaluate::{evaluate, ExperimentOutcome};
pub use experiment::{Experiment, BUILT_IN};
pub use runner::{ExperimentFailure, StudyReport, StudyRunner};
pub use statistics::{RunStatistics, StatisticsCollector};
