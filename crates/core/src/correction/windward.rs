//! Windward reference site selection.
//!
//! Given a wind direction (the compass direction the wind blows *from*),
//! pick the upstream candidate site whose air mass will cross the target.
//! No qualifying site is a recoverable outcome: the corrector then skips
//! the correction entirely rather than guess a reference.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core_types::{angular_difference_deg, LatLon};

/// A candidate reference site in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Registry identifier.
    pub id: String,
    /// Site position.
    pub location: LatLon,
}

/// The selected upstream reference, consumed once by the corrector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindwardReference {
    /// Identifier of the chosen site.
    pub site_id: String,
    /// Position of the chosen site.
    pub location: LatLon,
    /// Great-circle distance from the target (km).
    pub distance_km: f64,
    /// Bearing from the target to the site (degrees, 0 = north).
    pub bearing_deg: f64,
}

/// Qualification window for windward candidates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindwardSelectorConfig {
    /// Half-width of the acceptable bearing window around the wind
    /// direction (degrees).
    pub bearing_tolerance_deg: f64,
    /// Minimum usable distance (km); closer sites share the target's own
    /// air mass.
    pub min_distance_km: f64,
    /// Maximum usable distance (km); farther sites are no longer on the
    /// same trajectory.
    pub max_distance_km: f64,
}

impl Default for WindwardSelectorConfig {
    fn default() -> Self {
        Self {
            bearing_tolerance_deg: 30.0,
            min_distance_km: 5.0,
            max_distance_km: 50.0,
        }
    }
}

/// Select the nearest candidate lying upwind of the target.
///
/// A candidate qualifies when the bearing from the target to it falls
/// within the tolerance window of `wind_direction_deg` (wraparound-safe)
/// and its distance lies inside the configured band. `None` means no
/// qualifying site; the caller must fall back to uncorrected output.
#[must_use]
pub fn select_windward(
    target: LatLon,
    wind_direction_deg: f64,
    sites: &[Site],
    config: &WindwardSelectorConfig,
) -> Option<WindwardReference> {
    let mut best: Option<WindwardReference> = None;

    for site in sites {
        let distance_km = target.distance_km(&site.location);
        if distance_km < config.min_distance_km || distance_km > config.max_distance_km {
            continue;
        }

        let bearing_deg = target.bearing_deg_to(&site.location);
        if angular_difference_deg(bearing_deg, wind_direction_deg) > config.bearing_tolerance_deg {
            continue;
        }

        let closer = best
            .as_ref()
            .is_none_or(|current| distance_km < current.distance_km);
        if closer {
            best = Some(WindwardReference {
                site_id: site.id.clone(),
                location: site.location,
                distance_km,
                bearing_deg,
            });
        }
    }

    match &best {
        Some(reference) => debug!(
            site_id = %reference.site_id,
            distance_km = reference.distance_km,
            bearing_deg = reference.bearing_deg,
            "windward site selected"
        ),
        None => debug!(
            wind_direction_deg,
            candidates = sites.len(),
            "no qualifying windward site"
        ),
    }

    best
}
