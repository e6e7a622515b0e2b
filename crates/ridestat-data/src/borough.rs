//! NYC borough assignment from coordinates.
//!
//! Boroughs are approximated by fixed latitude/longitude boxes. Boxes are
//! checked in [`BOROUGH_BOUNDS`] order with inclusive bounds and the first
//! match wins, so points on a shared edge go to the earlier borough.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// NYC borough, or `Other` for points outside every box.
///
/// Deserializes from snake_case names and from the display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Borough {
    #[serde(alias = "Manhattan")]
    Manhattan,
    #[serde(alias = "Brooklyn")]
    Brooklyn,
    #[serde(alias = "Queens")]
    Queens,
    #[serde(alias = "Bronx")]
    Bronx,
    #[serde(alias = "Staten Island", alias = "staten island", alias = "StatenIsland")]
    StatenIsland,
    #[serde(alias = "Other")]
    Other,
}

impl Borough {
    /// Boroughs with a bounding box, in lookup order.
    pub const MAPPED: [Borough; 5] = [
        Borough::Manhattan,
        Borough::Brooklyn,
        Borough::Queens,
        Borough::Bronx,
        Borough::StatenIsland,
    ];

    /// Assigns a borough to a coordinate pair.
    ///
    /// # Example
    ///
    /// ```
    /// use ridestat_data::Borough;
    ///
    /// assert_eq!(Borough::locate(40.75, -73.95), Borough::Manhattan);
    /// assert_eq!(Borough::locate(40.65, -73.95), Borough::Brooklyn);
    /// assert_eq!(Borough::locate(41.5, -73.95), Borough::Other);
    /// ```
    pub fn locate(lat: f64, lon: f64) -> Borough {
        BOROUGH_BOUNDS
            .iter()
            .find(|b| b.contains(lat, lon))
            .map(|b| b.borough)
            .unwrap_or(Borough::Other)
    }

    /// Assigns a borough when coordinates may be missing.
    pub fn locate_opt(lat: Option<f64>, lon: Option<f64>) -> Borough {
        match (lat, lon) {
            (Some(lat), Some(lon)) => Self::locate(lat, lon),
            _ => Borough::Other,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Borough::Manhattan => "Manhattan",
            Borough::Brooklyn => "Brooklyn",
            Borough::Queens => "Queens",
            Borough::Bronx => "Bronx",
            Borough::StatenIsland => "Staten Island",
            Borough::Other => "Other",
        }
    }
}

impl fmt::Display for Borough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Borough {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "manhattan" => Ok(Borough::Manhattan),
            "brooklyn" => Ok(Borough::Brooklyn),
            "queens" => Ok(Borough::Queens),
            "bronx" => Ok(Borough::Bronx),
            "staten_island" => Ok(Borough::StatenIsland),
            "other" => Ok(Borough::Other),
            _ => Err(format!("unknown borough '{s}'")),
        }
    }
}

/// Inclusive latitude/longitude box for one borough.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoroughBounds {
    pub borough: Borough,
    /// `(min, max)` latitude.
    pub lat: (f64, f64),
    /// `(min, max)` longitude.
    pub lon: (f64, f64),
}

impl BoroughBounds {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.lat.0 <= lat && lat <= self.lat.1 && self.lon.0 <= lon && lon <= self.lon.1
    }
}

/// Borough boxes in lookup order.
pub const BOROUGH_BOUNDS: [BoroughBounds; 5] = [
    BoroughBounds {
        borough: Borough::Manhattan,
        lat: (40.7, 40.8),
        lon: (-74.0, -73.9),
    },
    BoroughBounds {
        borough: Borough::Brooklyn,
        lat: (40.6, 40.7),
        lon: (-74.0, -73.9),
    },
    BoroughBounds {
        borough: Borough::Queens,
        lat: (40.7, 40.8),
        lon: (-73.9, -73.7),
    },
    BoroughBounds {
        borough: Borough::Bronx,
        lat: (40.8, 40.9),
        lon: (-73.9, -73.8),
    },
    BoroughBounds {
        borough: Borough::StatenIsland,
        lat: (40.5, 40.6),
        lon: (-74.2, -74.0),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_box_center() {
        for bounds in BOROUGH_BOUNDS {
            let lat = (bounds.lat.0 + bounds.lat.1) / 2.0;
            let lon = (bounds.lon.0 + bounds.lon.1) / 2.0;
            assert_eq!(Borough::locate(lat, lon), bounds.borough);
        }
    }

    #[test]
    fn test_shared_edge_goes_to_earlier_box() {
        // lat 40.7 is the Manhattan/Brooklyn edge.
        assert_eq!(Borough::locate(40.7, -73.95), Borough::Manhattan);
        // lon -73.9 is the Manhattan/Queens edge.
        assert_eq!(Borough::locate(40.75, -73.9), Borough::Manhattan);
        // lat 40.8 is the Manhattan/Bronx edge at lon -73.9.
        assert_eq!(Borough::locate(40.8, -73.9), Borough::Manhattan);
    }

    #[test]
    fn test_gap_between_boxes_is_other() {
        // Between Staten Island (<= 40.6) and Brooklyn (lon >= -74.0) in the west.
        assert_eq!(Borough::locate(40.65, -74.1), Borough::Other);
    }

    #[test]
    fn test_missing_coordinates() {
        assert_eq!(Borough::locate_opt(None, Some(-73.95)), Borough::Other);
        assert_eq!(
            Borough::locate_opt(Some(40.75), Some(-73.95)),
            Borough::Manhattan
        );
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Staten Island".parse::<Borough>().unwrap(), Borough::StatenIsland);
        assert_eq!("brooklyn".parse::<Borough>().unwrap(), Borough::Brooklyn);
        assert!("Hoboken".parse::<Borough>().is_err());
        assert_eq!(Borough::StatenIsland.to_string(), "Staten Island");
    }
}
