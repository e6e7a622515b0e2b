//! Shared test fixtures for RideStat crates.
//!
//! This crate provides synthetic pickups and sample ride files for testing.
//! It depends only on `ridestat-data` so every other crate can use it.
//!
//! - [`pickups`] - deterministic synthetic pickups and datasets
//! - [`files`] - sample CSV files in the raw ride layouts
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! ridestat-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use ridestat_test::pickups::{april_2014, PickupBuilder, MANHATTAN};
//! use ridestat_test::files::sample_data_dir;
//! ```

pub mod files;
pub mod pickups;

pub use files::{april_2014_dir, sample_data_dir, write_raw_csv};
pub use pickups::{april_2014, date, PickupBuilder, BROOKLYN, MANHATTAN, OUTSIDE, QUEENS};
