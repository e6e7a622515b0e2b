//! Deterministic synthetic pickups.
//!
//! # Example
//!
//! ```
//! use ridestat_test::pickups::{date, PickupBuilder, MANHATTAN};
//!
//! let dataset = PickupBuilder::new()
//!     .add(date(2014, 4, 4), 20, 3, MANHATTAN)
//!     .dataset();
//! assert_eq!(dataset.len(), 3);
//! ```

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};
use ridestat_data::{Dataset, Pickup};

/// A point inside the Manhattan box.
pub const MANHATTAN: (f64, f64) = (40.75, -73.95);
/// A point inside the Brooklyn box.
pub const BROOKLYN: (f64, f64) = (40.65, -73.95);
/// A point inside the Queens box.
pub const QUEENS: (f64, f64) = (40.75, -73.8);
/// A point outside every borough box.
pub const OUTSIDE: (f64, f64) = (41.5, -73.95);

/// Shorthand for a calendar date; panics on an invalid date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Builds pickups hour by hour.
#[derive(Debug, Clone)]
pub struct PickupBuilder {
    service: Arc<str>,
    source_file: Arc<str>,
    pickups: Vec<Pickup>,
}

impl Default for PickupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PickupBuilder {
    pub fn new() -> Self {
        Self {
            service: Arc::from("Uber_apr_14"),
            source_file: Arc::from("uber-raw-data-apr14.csv"),
            pickups: Vec::new(),
        }
    }

    /// Adds `count` pickups at `location` spread over the minutes of one hour.
    pub fn add(mut self, date: NaiveDate, hour: u32, count: usize, location: (f64, f64)) -> Self {
        for i in 0..count {
            let minute = (i % 60) as u32;
            let timestamp = date
                .and_hms_opt(hour, minute, 0)
                .expect("valid fixture time");
            self.pickups.push(
                Pickup::new(timestamp)
                    .with_location(location.0, location.1)
                    .with_base("B02512")
                    .with_source(self.service.clone(), self.source_file.clone()),
            );
        }
        self
    }

    /// Adds `count` pickups with no coordinates.
    pub fn add_unlocated(mut self, date: NaiveDate, hour: u32, count: usize) -> Self {
        for i in 0..count {
            let timestamp = date
                .and_hms_opt(hour, (i % 60) as u32, 0)
                .expect("valid fixture time");
            self.pickups.push(
                Pickup::new(timestamp).with_source(self.service.clone(), self.source_file.clone()),
            );
        }
        self
    }

    pub fn len(&self) -> usize {
        self.pickups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pickups.is_empty()
    }

    pub fn build(self) -> Vec<Pickup> {
        self.pickups
    }

    pub fn dataset(self) -> Dataset {
        Dataset::new(self.pickups)
    }
}

/// Evening pickups per hour for one date.
///
/// Fridays are busier than Monday–Thursday; weekends sit in between.
pub fn evening_count(date: NaiveDate, hour: u32) -> usize {
    let day = date.day() as usize;
    let hour = hour as usize;
    match date.weekday() {
        Weekday::Fri => 30 + (day + hour) % 4,
        Weekday::Sat | Weekday::Sun => 20,
        _ => 15 + (day * hour) % 5,
    }
}

/// Pickups at noon on every date.
pub const NOON_COUNT: usize = 6;

/// Every date of April 2014 with evening and noon traffic.
///
/// Evening hours (18..=23) follow [`evening_count`]; every third pickup is in
/// Brooklyn and the rest in Manhattan.
pub fn april_2014() -> Dataset {
    let mut builder = PickupBuilder::new();
    for day in 1..=30 {
        let d = date(2014, 4, day);
        builder = add_split(builder, d, 12, NOON_COUNT);
        for hour in 18..=23 {
            builder = add_split(builder, d, hour, evening_count(d, hour));
        }
    }
    builder.dataset()
}

fn add_split(builder: PickupBuilder, date: NaiveDate, hour: u32, count: usize) -> PickupBuilder {
    let brooklyn = count / 3;
    builder
        .add(date, hour, count - brooklyn, MANHATTAN)
        .add(date, hour, brooklyn, BROOKLYN)
}
