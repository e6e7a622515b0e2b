//! Cohort membership: which pickups and which units belong to a group.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use ridestat_config::{CohortConfig, HourRange};
use ridestat_data::{Borough, EnrichedPickup};

use crate::aggregate::UnitKey;

/// A group of pickups compared in an experiment.
///
/// `contains` decides membership of a single pickup. `admits_unit` decides
/// whether an aggregation unit can hold members at all, so units with no
/// member pickups still count as zero-valued observations.
pub trait Cohort: Send + Sync {
    fn label(&self) -> &str;

    fn contains(&self, pickup: &EnrichedPickup) -> bool;

    fn admits_unit(&self, unit: &UnitKey) -> bool;
}

/// Cohort defined by weekday, hour, borough and date filters.
///
/// Every non-empty filter must match. Empty filters match everything.
///
/// # Example
///
/// ```
/// use chrono::Weekday;
/// use ridestat_config::HourRange;
/// use ridestat_engine::{Cohort, CohortSpec};
///
/// let friday_evening = CohortSpec::new("Friday evening")
///     .with_weekdays([Weekday::Fri])
///     .with_hours(HourRange::new(18, 23));
///
/// assert_eq!(friday_evening.label(), "Friday evening");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CohortSpec {
    label: String,
    weekdays: Vec<Weekday>,
    hours: Option<HourRange>,
    boroughs: Vec<Borough>,
    dates: BTreeSet<NaiveDate>,
}

impl CohortSpec {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Builds a cohort from its file form, describing the filters when no
    /// label is given.
    pub fn from_config(config: &CohortConfig) -> Self {
        let mut spec = Self {
            label: String::new(),
            weekdays: config.weekdays.clone(),
            hours: config.hours,
            boroughs: config.boroughs.clone(),
            dates: config.dates.iter().copied().collect(),
        };
        spec.label = match &config.label {
            Some(label) => label.clone(),
            None => spec.describe(),
        };
        spec
    }

    pub fn with_weekdays(mut self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        self.weekdays = weekdays.into_iter().collect();
        self
    }

    pub fn with_hours(mut self, hours: HourRange) -> Self {
        self.hours = Some(hours);
        self
    }

    pub fn with_boroughs(mut self, boroughs: impl IntoIterator<Item = Borough>) -> Self {
        self.boroughs = boroughs.into_iter().collect();
        self
    }

    pub fn with_dates(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.dates = dates.into_iter().collect();
        self
    }

    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekdays
    }

    pub fn hours(&self) -> Option<HourRange> {
        self.hours
    }

    pub fn boroughs(&self) -> &[Borough] {
        &self.boroughs
    }

    pub fn dates(&self) -> &BTreeSet<NaiveDate> {
        &self.dates
    }

    /// Short description of the active filters, e.g. `Fri 18-23h`.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.weekdays.is_empty() {
            let days: Vec<String> = self.weekdays.iter().map(|d| d.to_string()).collect();
            parts.push(days.join(","));
        }
        if let Some(hours) = self.hours {
            parts.push(format!("{}-{}h", hours.start, hours.end));
        }
        if !self.boroughs.is_empty() {
            let names: Vec<&str> = self.boroughs.iter().map(|b| b.name()).collect();
            parts.push(names.join(","));
        }
        if !self.dates.is_empty() {
            parts.push(format!("{} dates", self.dates.len()));
        }
        if parts.is_empty() {
            "all pickups".to_string()
        } else {
            parts.join(" ")
        }
    }

    fn matches_date(&self, date: NaiveDate) -> bool {
        (self.weekdays.is_empty() || self.weekdays.contains(&date.weekday()))
            && (self.dates.is_empty() || self.dates.contains(&date))
    }
}

impl Cohort for CohortSpec {
    fn label(&self) -> &str {
        &self.label
    }

    fn contains(&self, pickup: &EnrichedPickup) -> bool {
        let features = &pickup.features;
        self.matches_date(features.date)
            && self.hours.map_or(true, |h| h.contains(features.hour))
            && (self.boroughs.is_empty() || self.boroughs.contains(&features.borough))
    }

    // Boroughs are not a property of a unit, so they never exclude one.
    fn admits_unit(&self, unit: &UnitKey) -> bool {
        self.matches_date(unit.date)
            && match (self.hours, unit.hour) {
                (Some(range), Some(hour)) => range.contains(hour),
                _ => true,
            }
    }
}
