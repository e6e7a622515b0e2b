//! Experiment definitions: a named pair of cohorts and an aggregation unit.

use chrono::{NaiveDate, Weekday};
use ridestat_config::{AggregationUnit, ExperimentConfig, HourRange};
use ridestat_data::features::{EVENING_END_HOUR, EVENING_START_HOUR};
use ridestat_data::Borough;

use crate::cohort::CohortSpec;
use crate::error::{EngineError, Result};

/// Names accepted by [`Experiment::by_name`].
pub const BUILT_IN: [&str; 3] = ["rainy_clear", "friday_night", "manhattan_brooklyn"];

/// Minimum Jaro–Winkler similarity for a name suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Treatment against control, counted per `unit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experiment {
    pub name: String,
    pub treatment: CohortSpec,
    pub control: CohortSpec,
    pub unit: AggregationUnit,
}

impl Experiment {
    pub fn new(
        name: impl Into<String>,
        treatment: CohortSpec,
        control: CohortSpec,
        unit: AggregationUnit,
    ) -> Self {
        Self {
            name: name.into(),
            treatment,
            control,
            unit,
        }
    }

    pub fn with_unit(mut self, unit: AggregationUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Pickups on rainy dates against pickups on clear dates.
    pub fn rainy_clear(
        rainy: impl IntoIterator<Item = NaiveDate>,
        clear: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        Self::new(
            "rainy_clear",
            CohortSpec::new("Rainy days").with_dates(rainy),
            CohortSpec::new("Clear days").with_dates(clear),
            AggregationUnit::Day,
        )
    }

    /// Friday evenings against Monday–Thursday evenings.
    ///
    /// # Example
    ///
    /// ```
    /// use ridestat_engine::{Cohort, Experiment};
    ///
    /// let experiment = Experiment::friday_night();
    /// assert_eq!(experiment.treatment.label(), "Friday night");
    /// assert_eq!(experiment.control.label(), "Weekday night");
    /// ```
    pub fn friday_night() -> Self {
        let evening = HourRange::new(EVENING_START_HOUR, EVENING_END_HOUR);
        Self::new(
            "friday_night",
            CohortSpec::new("Friday night")
                .with_weekdays([Weekday::Fri])
                .with_hours(evening),
            CohortSpec::new("Weekday night")
                .with_weekdays([Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu])
                .with_hours(evening),
            AggregationUnit::Day,
        )
    }

    /// Manhattan pickups against Brooklyn pickups.
    pub fn manhattan_brooklyn() -> Self {
        Self::new(
            "manhattan_brooklyn",
            CohortSpec::new("Manhattan").with_boroughs([Borough::Manhattan]),
            CohortSpec::new("Brooklyn").with_boroughs([Borough::Brooklyn]),
            AggregationUnit::Day,
        )
    }

    /// Experiments run when a study names none.
    ///
    /// `rainy_clear` is left out because it needs date labels.
    pub fn defaults() -> Vec<Self> {
        vec![Self::friday_night(), Self::manhattan_brooklyn()]
    }

    /// Looks up a built-in experiment that needs no parameters.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownExperiment`] with the closest known
    /// name, and [`EngineError::Config`] for `rainy_clear`, whose dates can
    /// only come from a study file.
    pub fn by_name(name: &str) -> Result<Self> {
        match name {
            "friday_night" => Ok(Self::friday_night()),
            "manhattan_brooklyn" => Ok(Self::manhattan_brooklyn()),
            "rainy_clear" => Err(EngineError::Config(ridestat_config::ConfigError::Invalid(
                "rainy_clear needs rainy_dates and clear_dates; declare it in the study file"
                    .to_string(),
            ))),
            _ => Err(unknown_experiment(name, BUILT_IN)),
        }
    }

    /// Builds an experiment from its file form.
    pub fn from_config(config: &ExperimentConfig) -> Self {
        let experiment = match config {
            ExperimentConfig::RainyClear(c) => {
                Self::rainy_clear(c.rainy_dates.iter().copied(), c.clear_dates.iter().copied())
            }
            ExperimentConfig::FridayNight(_) => Self::friday_night(),
            ExperimentConfig::ManhattanBrooklyn(_) => Self::manhattan_brooklyn(),
            ExperimentConfig::Custom(c) => Self::new(
                c.name.clone(),
                CohortSpec::from_config(&c.treatment),
                CohortSpec::from_config(&c.control),
                c.unit,
            ),
        };
        experiment.with_unit(config.unit())
    }

    /// Picks experiments by name, preferring configured ones over built-ins.
    pub fn select(configured: &[ExperimentConfig], names: &[String]) -> Result<Vec<Self>> {
        names
            .iter()
            .map(|name| match configured.iter().find(|c| c.name() == name) {
                Some(config) => Ok(Self::from_config(config)),
                None => Self::by_name(name).map_err(|e| match e {
                    EngineError::UnknownExperiment { .. } => {
                        let known = configured
                            .iter()
                            .map(ExperimentConfig::name)
                            .chain(BUILT_IN)
                            .collect::<Vec<_>>();
                        unknown_experiment(name, known)
                    }
                    other => other,
                }),
            })
            .collect()
    }
}

fn unknown_experiment<'a>(name: &str, known: impl IntoIterator<Item = &'a str>) -> EngineError {
    let mut available: Vec<String> = Vec::new();
    for candidate in known {
        if !available.iter().any(|a| a == candidate) {
            available.push(candidate.to_string());
        }
    }
    let suggestion = available
        .iter()
        .map(|candidate| (strsim::jaro_winkler(name, candidate), candidate))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate.clone());

    EngineError::UnknownExperiment {
        name: name.to_string(),
        suggestion,
        available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ridestat_config::{CohortConfig, CustomExperimentConfig, RainyClearConfig, UnitConfig};

    use crate::cohort::Cohort;

    #[test]
    fn test_by_name() {
        assert_eq!(
            Experiment::by_name("friday_night").unwrap(),
            Experiment::friday_night()
        );
        assert!(matches!(
            Experiment::by_name("rainy_clear"),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_name_suggests_closest() {
        let err = Experiment::by_name("friday_nite").unwrap_err();
        let EngineError::UnknownExperiment {
            suggestion,
            available,
            ..
        } = &err
        else {
            panic!("expected UnknownExperiment, got {err:?}");
        };
        assert_eq!(suggestion.as_deref(), Some("friday_night"));
        assert_eq!(available.len(), 3);
        assert!(err.to_string().contains("did you mean 'friday_night'"));
    }

    #[test]
    fn test_unrelated_name_has_no_suggestion() {
        let err = Experiment::by_name("zzz").unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnknownExperiment {
                suggestion: None,
                ..
            }
        ));
    }

    #[test]
    fn test_from_config_applies_unit() {
        let config = ExperimentConfig::ManhattanBrooklyn(UnitConfig {
            unit: AggregationUnit::DayHour,
        });
        let experiment = Experiment::from_config(&config);
        assert_eq!(experiment.unit, AggregationUnit::DayHour);
        assert_eq!(experiment.treatment.label(), "Manhattan");
    }

    #[test]
    fn test_from_config_rainy_clear() {
        let rainy = NaiveDate::from_ymd_opt(2014, 4, 30).unwrap();
        let clear = NaiveDate::from_ymd_opt(2014, 4, 1).unwrap();
        let config = ExperimentConfig::RainyClear(RainyClearConfig {
            rainy_dates: vec![rainy],
            clear_dates: vec![clear],
            unit: AggregationUnit::Day,
        });
        let experiment = Experiment::from_config(&config);
        assert!(experiment.treatment.dates().contains(&rainy));
        assert!(experiment.control.dates().contains(&clear));
    }

    #[test]
    fn test_select_prefers_configured() {
        let configured = vec![ExperimentConfig::Custom(CustomExperimentConfig {
            name: "weekend".to_string(),
            treatment: CohortConfig {
                weekdays: vec![Weekday::Sat, Weekday::Sun],
                ..CohortConfig::default()
            },
            control: CohortConfig {
                weekdays: vec![Weekday::Mon],
                ..CohortConfig::default()
            },
            unit: AggregationUnit::Day,
        })];

        let selected = Experiment::select(
            &configured,
            &["weekend".to_string(), "friday_night".to_string()],
        )
        .unwrap();
        assert_eq!(selected[0].name, "weekend");
        assert_eq!(selected[1].name, "friday_night");

        let err = Experiment::select(&configured, &["weekends".to_string()]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnknownExperiment { suggestion: Some(ref s), .. } if s == "weekend"
        ));
    }
}
