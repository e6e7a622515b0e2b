//! Features derived from a pickup's timestamp and location.
//!
//! Hour windows (all inclusive of their lower bound):
//!
//! | flag                 | rule                                   |
//! |----------------------|----------------------------------------|
//! | `is_weekend`         | Saturday or Sunday                     |
//! | `is_friday_evening`  | Friday, 18 <= hour <= 23               |
//! | `is_weekday_evening` | Monday–Thursday, 18 <= hour <= 23      |
//! | `is_late_night`      | 0 <= hour < 4                          |
//! | `is_early_morning`   | 6 <= hour < 10                         |
//! | `is_business_hours`  | 9 <= hour <= 17, not weekend           |
//! | `is_peak_hour`       | 7 <= hour <= 9 or 17 <= hour <= 19     |

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

use crate::borough::Borough;

/// First hour of the evening window.
pub const EVENING_START_HOUR: u32 = 18;
/// Last hour of the evening window.
pub const EVENING_END_HOUR: u32 = 23;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupFeatures {
    pub date: NaiveDate,
    /// Hour of day, 0..=23.
    pub hour: u32,
    pub weekday: Weekday,
    pub month: u32,
    pub year: i32,
    pub is_weekend: bool,
    pub is_friday_evening: bool,
    pub is_weekday_evening: bool,
    pub is_late_night: bool,
    pub is_early_morning: bool,
    pub is_business_hours: bool,
    pub is_peak_hour: bool,
    pub borough: Borough,
}

impl PickupFeatures {
    /// Derives all features.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{NaiveDate, Weekday};
    /// use ridestat_data::PickupFeatures;
    ///
    /// // 2014-04-07 was a Monday.
    /// let ts = NaiveDate::from_ymd_opt(2014, 4, 7).unwrap().and_hms_opt(8, 30, 0).unwrap();
    /// let f = PickupFeatures::derive(ts, None, None);
    ///
    /// assert_eq!(f.weekday, Weekday::Mon);
    /// assert!(f.is_peak_hour);
    /// assert!(f.is_early_morning);
    /// assert!(!f.is_business_hours);
    /// ```
    pub fn derive(timestamp: NaiveDateTime, lat: Option<f64>, lon: Option<f64>) -> Self {
        let date = timestamp.date();
        let hour = timestamp.hour();
        let weekday = date.weekday();
        let is_weekend = matches!(weekday, Weekday::Sat | Weekday::Sun);
        let is_evening = (EVENING_START_HOUR..=EVENING_END_HOUR).contains(&hour);

        Self {
            date,
            hour,
            weekday,
            month: date.month(),
            year: date.year(),
            is_weekend,
            is_friday_evening: weekday == Weekday::Fri && is_evening,
            is_weekday_evening: is_mon_to_thu(weekday) && is_evening,
            is_late_night: hour < 4,
            is_early_morning: (6..10).contains(&hour),
            is_business_hours: (9..=17).contains(&hour) && !is_weekend,
            is_peak_hour: (7..=9).contains(&hour) || (17..=19).contains(&hour),
            borough: Borough::locate_opt(lat, lon),
        }
    }
}

fn is_mon_to_thu(weekday: Weekday) -> bool {
    matches!(
        weekday,
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu
    )
}
