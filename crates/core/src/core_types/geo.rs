//! Geographic primitives: positions, great-circle distance, bearings.
//!
//! Used by the windward site selection to place candidate reference sites
//! relative to a target location under a given wind direction.

use serde::{Deserialize, Serialize};

/// Mean Earth radius (km), haversine convention.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude (degrees, north positive).
    pub lat_deg: f64,
    /// Longitude (degrees, east positive).
    pub lon_deg: f64,
}

impl LatLon {
    /// Create a position from decimal degrees.
    #[must_use]
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }

    /// Great-circle distance to another position (km).
    ///
    /// Haversine formula:
    /// ```text
    /// a = sin²(Δφ/2) + cos φ₁ · cos φ₂ · sin²(Δλ/2)
    /// d = 2R · asin(√a)
    /// ```
    #[must_use]
    pub fn distance_km(&self, other: &LatLon) -> f64 {
        let lat1 = self.lat_deg.to_radians();
        let lat2 = other.lat_deg.to_radians();
        let dlat = (other.lat_deg - self.lat_deg).to_radians();
        let dlon = (other.lon_deg - self.lon_deg).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }

    /// Initial bearing from `self` toward `other` (degrees, 0 = north,
    /// increasing clockwise), the meteorological compass convention.
    #[must_use]
    pub fn bearing_deg_to(&self, other: &LatLon) -> f64 {
        let lat1 = self.lat_deg.to_radians();
        let lat2 = other.lat_deg.to_radians();
        let dlon = (other.lon_deg - self.lon_deg).to_radians();

        let y = dlon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
        y.atan2(x).to_degrees().rem_euclid(360.0)
    }
}

/// Smallest angular separation between two compass directions (degrees, 0-180).
#[must_use]
pub fn angular_difference_deg(a_deg: f64, b_deg: f64) -> f64 {
    let diff = (a_deg - b_deg).rem_euclid(360.0);
    diff.min(360.0 - diff)
}
