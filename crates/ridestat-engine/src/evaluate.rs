//! Significance testing of one experiment.

use ridestat_config::{AggregationUnit, AnalysisConfig};
use ridestat_core::bootstrap::mean_difference_ci;
use ridestat_core::{
    achieved_power, required_sample_size, two_sample, BootstrapInterval, EffectSize, Summary,
    TTestResult,
};
use ridestat_data::Dataset;
use serde::Serialize;
use tracing::debug;

use crate::aggregate::aggregate_pair;
use crate::cohort::Cohort;
use crate::error::{EngineError, Result};
use crate::experiment::Experiment;

/// Result of evaluating one experiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentOutcome {
    pub name: String,
    pub treatment_label: String,
    pub control_label: String,
    pub unit: AggregationUnit,
    /// Pickups counted in each cohort.
    pub treatment_pickups: u64,
    pub control_pickups: u64,
    /// Per-unit count summaries.
    pub treatment: Summary,
    pub control: Summary,
    pub test: TTestResult,
    pub effect: EffectSize,
    pub bootstrap: Option<BootstrapInterval>,
    /// Power to detect the observed Cohen's d at the observed unit counts.
    pub power: f64,
    /// Units per group needed to reach the target power for the observed d.
    pub required_units: Option<usize>,
    /// Set once a multiple-testing correction has been applied.
    pub adjusted_p_value: Option<f64>,
    pub significant: bool,
    pub alpha: f64,
}

impl ExperimentOutcome {
    /// The p-value that decides significance.
    pub fn decision_p_value(&self) -> f64 {
        self.adjusted_p_value.unwrap_or(self.test.p_value)
    }

    pub(crate) fn apply_adjusted(&mut self, adjusted: f64) {
        self.adjusted_p_value = Some(adjusted);
        self.significant = adjusted < self.alpha;
    }
}

/// Aggregates both cohorts of `experiment` and tests their difference.
///
/// # Errors
///
/// Fails with [`EngineError::OverlappingCohorts`] when any pickup belongs to
/// both cohorts, and with a statistics error when either cohort has fewer
/// than two units or both are constant.
pub fn evaluate(
    dataset: &Dataset,
    experiment: &Experiment,
    settings: &AnalysisConfig,
) -> Result<ExperimentOutcome> {
    let paired = aggregate_pair(
        dataset,
        &experiment.treatment,
        &experiment.control,
        experiment.unit,
    );
    if paired.overlap > 0 {
        return Err(EngineError::OverlappingCohorts {
            experiment: experiment.name.clone(),
            treatment: experiment.treatment.label().to_string(),
            control: experiment.control.label().to_string(),
            count: paired.overlap,
        });
    }

    let treatment = paired.treatment.values();
    let control = paired.control.values();

    let test = two_sample(
        &treatment,
        &control,
        settings.test,
        settings.alternative,
        settings.alpha,
    )?;
    let effect = EffectSize::compute(&treatment, &control)?;

    let bootstrap = settings
        .bootstrap
        .as_ref()
        .map(|config| mean_difference_ci(&treatment, &control, config))
        .transpose()?;

    let power = achieved_power(
        effect.cohens_d,
        treatment.len(),
        control.len(),
        settings.alpha,
        settings.alternative,
    )?;
    let required_units = required_sample_size(
        effect.cohens_d,
        settings.alpha,
        settings.power,
        settings.alternative,
    )
    .ok();

    debug!(
        experiment = experiment.name.as_str(),
        statistic = test.statistic,
        p_value = test.p_value,
        cohens_d = effect.cohens_d,
        "Evaluated experiment"
    );

    Ok(ExperimentOutcome {
        name: experiment.name.clone(),
        treatment_label: experiment.treatment.label().to_string(),
        control_label: experiment.control.label().to_string(),
        unit: experiment.unit,
        treatment_pickups: paired.treatment.total(),
        control_pickups: paired.control.total(),
        treatment: Summary::from_sample(&treatment)?,
        control: Summary::from_sample(&control)?,
        significant: test.is_significant(settings.alpha),
        test,
        effect,
        bootstrap,
        power,
        required_units,
        adjusted_p_value: None,
        alpha: settings.alpha,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Weekday;
    use ridestat_core::{BootstrapConfig, StatsError};
    use ridestat_data::Borough;
    use ridestat_test::pickups::{april_2014, date, PickupBuilder, MANHATTAN};

    use crate::cohort::CohortSpec;

    #[test]
    fn test_friday_night_is_significant() {
        let dataset = april_2014();
        let outcome = evaluate(
            &dataset,
            &Experiment::friday_night(),
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert_eq!(outcome.treatment.n, 4);
        // Monday–Thursday dates in April 2014.
        assert_eq!(outcome.control.n, 18);
        assert!(outcome.test.mean_difference > 0.0);
        assert!(outcome.test.p_value < 1e-6);
        assert!(outcome.significant);
        assert!(outcome.effect.cohens_d > 1.0);
        assert!(outcome.power > 0.9);
        assert!(outcome.bootstrap.is_none());
        assert_eq!(outcome.adjusted_p_value, None);
    }

    #[test]
    fn test_manhattan_brooklyn_counts_every_pickup() {
        let dataset = april_2014();
        let outcome = evaluate(
            &dataset,
            &Experiment::manhattan_brooklyn(),
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert_eq!(
            outcome.treatment_pickups + outcome.control_pickups,
            dataset.len() as u64
        );
        assert_eq!(outcome.treatment.n, 30);
        assert!(outcome.test.statistic > 0.0);
    }

    #[test]
    fn test_bootstrap_is_seeded() {
        let dataset = april_2014();
        let mut settings = AnalysisConfig::default();
        settings.bootstrap = Some(BootstrapConfig::new().with_resamples(500).with_seed(3));

        let first = evaluate(&dataset, &Experiment::friday_night(), &settings).unwrap();
        let second = evaluate(&dataset, &Experiment::friday_night(), &settings).unwrap();
        let interval = first.bootstrap.clone().unwrap();
        assert_eq!(first.bootstrap, second.bootstrap);
        assert!(interval.lower > 0.0);
    }

    #[test]
    fn test_overlapping_cohorts_rejected() {
        let dataset = april_2014();
        let experiment = Experiment::new(
            "overlap",
            CohortSpec::new("Fridays").with_weekdays([Weekday::Fri]),
            CohortSpec::new("Manhattan").with_boroughs([Borough::Manhattan]),
            AggregationUnit::Day,
        );

        let err = evaluate(&dataset, &experiment, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::OverlappingCohorts { count, .. } if count > 0));
    }

    #[test]
    fn test_too_few_units() {
        let dataset = PickupBuilder::new()
            .add(date(2014, 4, 4), 20, 5, MANHATTAN)
            .add(date(2014, 4, 7), 20, 5, MANHATTAN)
            .dataset();

        let err = evaluate(
            &dataset,
            &Experiment::friday_night(),
            &AnalysisConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Stats(StatsError::InsufficientData { .. })
        ));
    }
}
