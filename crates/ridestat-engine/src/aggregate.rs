//! Per-unit pickup counts.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ridestat_data::{Dataset, PickupFeatures};
use serde::Serialize;
use tracing::debug;

use crate::cohort::Cohort;

pub use ridestat_config::AggregationUnit;

/// Identifies one observation: a date, or a date and hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UnitKey {
    pub date: NaiveDate,
    /// Set only for [`AggregationUnit::DayHour`].
    pub hour: Option<u32>,
}

impl UnitKey {
    pub fn of(features: &PickupFeatures, unit: AggregationUnit) -> Self {
        Self {
            date: features.date,
            hour: match unit {
                AggregationUnit::Day => None,
                AggregationUnit::DayHour => Some(features.hour),
            },
        }
    }
}

/// Pickup counts per admitted unit, ordered by unit key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    counts: BTreeMap<UnitKey, u64>,
}

impl Aggregation {
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, key: &UnitKey) -> Option<u64> {
        self.counts.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UnitKey, &u64)> {
        self.counts.iter()
    }

    /// Total pickups across all units.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Counts as observations, in unit order.
    pub fn values(&self) -> Vec<f64> {
        self.counts.values().map(|&c| c as f64).collect()
    }
}

/// Counts `cohort` pickups per unit.
///
/// Units are every key observed in `dataset` that the cohort admits; an
/// admitted unit without member pickups counts as zero.
pub fn aggregate(dataset: &Dataset, cohort: &dyn Cohort, unit: AggregationUnit) -> Aggregation {
    let mut aggregation = Aggregation::default();
    for pickup in dataset {
        let key = UnitKey::of(&pickup.features, unit);
        let member = cohort.contains(pickup);
        if member || cohort.admits_unit(&key) {
            *aggregation.counts.entry(key).or_insert(0) += u64::from(member);
        }
    }
    debug!(
        cohort = cohort.label(),
        units = aggregation.len() as u64,
        pickups = aggregation.total(),
        "Aggregated cohort"
    );
    aggregation
}

/// Both cohorts of an experiment, counted in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairedAggregation {
    pub treatment: Aggregation,
    pub control: Aggregation,
    /// Pickups that belong to both cohorts.
    pub overlap: u64,
}

/// Counts treatment and control pickups per unit in a single scan.
pub fn aggregate_pair(
    dataset: &Dataset,
    treatment: &dyn Cohort,
    control: &dyn Cohort,
    unit: AggregationUnit,
) -> PairedAggregation {
    let mut paired = PairedAggregation::default();
    for pickup in dataset {
        let key = UnitKey::of(&pickup.features, unit);
        let in_treatment = treatment.contains(pickup);
        let in_control = control.contains(pickup);
        if in_treatment && in_control {
            paired.overlap += 1;
        }
        if in_treatment || treatment.admits_unit(&key) {
            *paired.treatment.counts.entry(key).or_insert(0) += u64::from(in_treatment);
        }
        if in_control || control.admits_unit(&key) {
            *paired.control.counts.entry(key).or_insert(0) += u64::from(in_control);
        }
    }
    debug!(
        treatment = treatment.label(),
        control = control.label(),
        treatment_units = paired.treatment.len() as u64,
        control_units = paired.control.len() as u64,
        overlap = paired.overlap,
        "Aggregated cohort pair"
    );
    paired
}
