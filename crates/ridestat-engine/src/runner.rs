//! Runs a study: every experiment against one dataset.

use std::fmt;

use rayon::prelude::*;
use ridestat_config::AnalysisConfig;
use ridestat_core::{adjust, CorrectionMethod};
use ridestat_data::Dataset;
use serde::{Serialize, Serializer};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::{EngineError, Result};
use crate::evaluate::{evaluate, ExperimentOutcome};
use crate::experiment::Experiment;
use crate::statistics::{RunStatistics, StatisticsCollector};

/// An experiment that could not be evaluated.
#[derive(Debug, Serialize)]
pub struct ExperimentFailure {
    pub name: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: EngineError,
}

fn serialize_display<T: fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Outcomes of a study, in experiment order.
#[derive(Debug, Serialize)]
pub struct StudyReport {
    pub outcomes: Vec<ExperimentOutcome>,
    pub failures: Vec<ExperimentFailure>,
    pub correction: CorrectionMethod,
    pub alpha: f64,
    pub statistics: RunStatistics,
}

impl StudyReport {
    pub fn outcome(&self, name: &str) -> Option<&ExperimentOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    pub fn significant_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.significant).count()
    }
}

/// Evaluates experiments in parallel with shared analysis settings.
///
/// # Example
///
/// ```
/// use ridestat_config::AnalysisConfig;
/// use ridestat_engine::{Experiment, StudyRunner};
/// use ridestat_test::pickups::april_2014;
///
/// let dataset = april_2014();
/// let report = StudyRunner::new(AnalysisConfig::default())
///     .run(&dataset, &Experiment::defaults());
///
/// assert_eq!(report.outcomes.len(), 2);
/// assert!(report.failures.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StudyRunner {
    settings: AnalysisConfig,
}

impl StudyRunner {
    pub fn new(settings: AnalysisConfig) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AnalysisConfig {
        &self.settings
    }

    /// Evaluates every experiment and applies the configured correction.
    ///
    /// A failing experiment is recorded in [`StudyReport::failures`] and does
    /// not stop the others.
    pub fn run(&self, dataset: &Dataset, experiments: &[Experiment]) -> StudyReport {
        let (sender, _receiver) = mpsc::unbounded_channel();
        self.run_with_channel(dataset, experiments, sender)
    }

    /// Like [`run`](Self::run), also sending each outcome as it completes.
    ///
    /// Streamed outcomes carry raw p-values; the correction needs the whole
    /// family and is only applied to the returned report. Send errors from a
    /// dropped receiver are ignored.
    pub fn run_with_channel(
        &self,
        dataset: &Dataset,
        experiments: &[Experiment],
        sender: mpsc::UnboundedSender<ExperimentOutcome>,
    ) -> StudyReport {
        let collector = StatisticsCollector::new();

        info!(
            event = "study_start",
            experiment_count = experiments.len() as u64,
            record_count = dataset.len() as u64,
            correction = %self.settings.correction,
            alpha = self.settings.alpha,
        );

        let results: Vec<Result<ExperimentOutcome>> = experiments
            .par_iter()
            .map(|experiment| {
                let result = evaluate(dataset, experiment, &self.settings);
                collector.record_scanned(dataset.len() as u64);
                match &result {
                    Ok(outcome) => {
                        collector.record_evaluated();
                        info!(
                            event = "experiment_end",
                            experiment = outcome.name.as_str(),
                            treatment_units = outcome.treatment.n as u64,
                            control_units = outcome.control.n as u64,
                            statistic = outcome.test.statistic,
                            p_value = outcome.test.p_value,
                            cohens_d = outcome.effect.cohens_d,
                        );
                        let _ = sender.send(outcome.clone());
                    }
                    Err(e) => {
                        collector.record_failed();
                        warn!(
                            event = "experiment_failed",
                            experiment = experiment.name.as_str(),
                            error = %e,
                        );
                    }
                }
                result
            })
            .collect();

        let mut outcomes = Vec::new();
        let mut failures = Vec::new();
        for (experiment, result) in experiments.iter().zip(results) {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(error) => failures.push(ExperimentFailure {
                    name: experiment.name.clone(),
                    error,
                }),
            }
        }

        self.apply_correction(&mut outcomes);

        let statistics = collector.snapshot();
        info!(
            event = "study_end",
            evaluated = statistics.experiments_evaluated,
            failed = statistics.experiments_failed,
            significant = outcomes.iter().filter(|o| o.significant).count() as u64,
            duration_ms = statistics.elapsed.as_millis() as u64,
        );

        StudyReport {
            outcomes,
            failures,
            correction: self.settings.correction,
            alpha: self.settings.alpha,
            statistics,
        }
    }

    fn apply_correction(&self, outcomes: &mut [ExperimentOutcome]) {
        if self.settings.correction == CorrectionMethod::None || outcomes.is_empty() {
            return;
        }
        let p_values: Vec<f64> = outcomes.iter().map(|o| o.test.p_value).collect();
        match adjust(&p_values, self.settings.correction) {
            Ok(adjusted) => {
                for (outcome, p) in outcomes.iter_mut().zip(adjusted) {
                    outcome.apply_adjusted(p);
                }
            }
            // p-values from a t-test are always in [0, 1]
            Err(e) => warn!(error = %e, "Skipped multiple-testing correction"),
        }
    }
}
