//! Ride-pickup data for RideStat.
//!
//! - [`record`] - raw pickup records as read from CSV
//! - [`features`] - calendar and time-window features derived per pickup
//! - [`borough`] - fixed NYC borough bounding boxes
//! - [`dataset`] - enriched, in-memory collection of pickups
//! - [`loader`] - directory discovery, CSV ingestion and dataset inventory
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use ridestat_data::{Borough, Dataset, Pickup};
//!
//! let ts = NaiveDate::from_ymd_opt(2014, 4, 4).unwrap().and_hms_opt(21, 15, 0).unwrap();
//! let dataset: Dataset = vec![Pickup::new(ts).with_location(40.75, -73.98)].into_iter().collect();
//!
//! let first = &dataset.pickups()[0];
//! assert!(first.features.is_friday_evening);
//! assert_eq!(first.features.borough, Borough::Manhattan);
//! ```

pub mod borough;
pub mod dataset;
pub mod error;
pub mod features;
pub mod loader;
pub mod record;

pub use borough::{Borough, BoroughBounds, BOROUGH_BOUNDS};
pub use dataset::{Dataset, EnrichedPickup, SourceFile};
pub use error::{DataError, Result};
pub use features::PickupFeatures;
pub use loader::{read_pickups, service_name, DataLoader, DatasetSummary, LoadOptions, ParsedFile};
pub use record::Pickup;
