//! In-memory dataset of enriched pickups.

use std::path::PathBuf;

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::features::PickupFeatures;
use crate::record::Pickup;

/// A pickup with its derived features.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedPickup {
    pub pickup: Pickup,
    pub features: PickupFeatures,
}

impl From<Pickup> for EnrichedPickup {
    fn from(pickup: Pickup) -> Self {
        let features = pickup.features();
        Self { pickup, features }
    }
}

/// A file that contributed rows to a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub service: String,
    pub path: PathBuf,
    /// Rows loaded.
    pub rows: usize,
    /// Rows skipped for unparseable timestamps.
    pub skipped: usize,
}

/// Enriched pickups plus the files they came from.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pickups: Vec<EnrichedPickup>,
    sources: Vec<SourceFile>,
}

impl Dataset {
    /// Enriches `pickups` in parallel.
    pub fn new(pickups: Vec<Pickup>) -> Self {
        Self::with_sources(pickups, Vec::new())
    }

    pub fn with_sources(pickups: Vec<Pickup>, sources: Vec<SourceFile>) -> Self {
        let pickups = pickups.into_par_iter().map(EnrichedPickup::from).collect();
        Self { pickups, sources }
    }

    pub fn pickups(&self) -> &[EnrichedPickup] {
        &self.pickups
    }

    pub fn sources(&self) -> &[SourceFile] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.pickups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pickups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnrichedPickup> {
        self.pickups.iter()
    }

    /// Earliest and latest pickup dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.pickups.iter().map(|p| p.features.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}

impl FromIterator<Pickup> for Dataset {
    fn from_iter<I: IntoIterator<Item = Pickup>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a EnrichedPickup;
    type IntoIter = std::slice::Iter<'a, EnrichedPickup>;

    fn into_iter(self) -> Self::IntoIter {
        self.pickups.iter()
    }
}
