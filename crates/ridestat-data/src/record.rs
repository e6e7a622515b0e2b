//! Raw pickup records.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::features::PickupFeatures;

/// A single ride pickup as read from a source file.
///
/// `service` and `source_file` are shared across all rows of one file.
#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub timestamp: NaiveDateTime,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Dispatching base code, e.g. `B02512`.
    pub base: Option<String>,
    /// Service name derived from the file name, e.g. `Uber_apr_14`.
    pub service: Arc<str>,
    pub source_file: Arc<str>,
}

impl Pickup {
    /// Creates a pickup with no location, base or source.
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            lat: None,
            lon: None,
            base: None,
            service: Arc::from(""),
            source_file: Arc::from(""),
        }
    }

    pub fn with_location(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_source(mut self, service: Arc<str>, source_file: Arc<str>) -> Self {
        self.service = service;
        self.source_file = source_file;
        self
    }

    /// Derives calendar, time-window and borough features.
    pub fn features(&self) -> PickupFeatures {
        PickupFeatures::derive(self.timestamp, self.lat, self.lon)
    }
}
