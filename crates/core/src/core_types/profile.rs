//! Vertical sounding data: per-level samples and the immutable profile.
//!
//! A `ThermodynamicProfile` is built once per request from raw provider
//! data and never mutated; the theta-e correction produces a new instance.
//!
//! # Conventions
//!
//! Pressure in hPa, temperature and dewpoint in °C, geopotential height in
//! meters. Levels are ordered strictly descending in pressure (surface
//! first), the standard radiosonde ordering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core_types::geo::LatLon;
use crate::errors::SoundingError;

/// Minimum number of levels a usable sounding must carry.
pub const MIN_LEVELS: usize = 4;

/// One sample on a pressure surface.
///
/// Temperature, dewpoint, and height are individually optional because
/// radiosonde significant levels frequently report moisture without
/// temperature or vice versa; a level missing both thermal fields is
/// rejected at profile construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureLevelSample {
    /// Pressure of the level (hPa).
    pub pressure_hpa: f64,
    /// Air temperature (°C).
    pub temperature_c: Option<f64>,
    /// Dewpoint temperature (°C).
    pub dewpoint_c: Option<f64>,
    /// Geopotential height (m).
    pub height_m: Option<f64>,
}

impl PressureLevelSample {
    /// Fully populated sample.
    #[must_use]
    pub fn new(pressure_hpa: f64, temperature_c: f64, dewpoint_c: f64, height_m: f64) -> Self {
        Self {
            pressure_hpa,
            temperature_c: Some(temperature_c),
            dewpoint_c: Some(dewpoint_c),
            height_m: Some(height_m),
        }
    }
}

/// Field selector for profile interpolation queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileField {
    /// Air temperature (°C).
    Temperature,
    /// Dewpoint temperature (°C).
    Dewpoint,
    /// Geopotential height (m).
    Height,
}

/// An ordered-by-pressure vertical sounding for one location and time.
///
/// Deserialization runs the same structural validation as
/// [`ThermodynamicProfile::new`], so a stored or transmitted profile can
/// never bypass the invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProfile")]
pub struct ThermodynamicProfile {
    location: LatLon,
    reference_time: DateTime<Utc>,
    levels: Vec<PressureLevelSample>,
}

/// Unvalidated wire shape of a profile.
#[derive(Deserialize)]
struct RawProfile {
    location: LatLon,
    reference_time: DateTime<Utc>,
    levels: Vec<PressureLevelSample>,
}

impl TryFrom<RawProfile> for ThermodynamicProfile {
    type Error = SoundingError;

    fn try_from(raw: RawProfile) -> Result<Self, Self::Error> {
        Self::new(raw.location, raw.reference_time, raw.levels)
    }
}

impl ThermodynamicProfile {
    /// Build a profile, validating the structural invariants.
    ///
    /// # Errors
    ///
    /// `SoundingError::InvalidProfile` when:
    /// - fewer than [`MIN_LEVELS`] levels are supplied,
    /// - pressures are not strictly decreasing,
    /// - any level is missing both temperature and dewpoint.
    ///
    /// There is no silent repair: a malformed sounding aborts the request.
    pub fn new(
        location: LatLon,
        reference_time: DateTime<Utc>,
        levels: Vec<PressureLevelSample>,
    ) -> Result<Self, SoundingError> {
        if levels.len() < MIN_LEVELS {
            return Err(SoundingError::InvalidProfile(format!(
                "{} levels supplied, at least {MIN_LEVELS} required",
                levels.len()
            )));
        }

        for pair in levels.windows(2) {
            if pair[1].pressure_hpa >= pair[0].pressure_hpa {
                return Err(SoundingError::InvalidProfile(format!(
                    "levels must be strictly decreasing in pressure, found {} hPa after {} hPa",
                    pair[1].pressure_hpa, pair[0].pressure_hpa
                )));
            }
        }

        for level in &levels {
            if level.temperature_c.is_none() && level.dewpoint_c.is_none() {
                return Err(SoundingError::InvalidProfile(format!(
                    "level at {} hPa carries neither temperature nor dewpoint",
                    level.pressure_hpa
                )));
            }
            if !level.pressure_hpa.is_finite() || level.pressure_hpa <= 0.0 {
                return Err(SoundingError::InvalidProfile(format!(
                    "non-physical pressure {} hPa",
                    level.pressure_hpa
                )));
            }
        }

        Ok(Self {
            location,
            reference_time,
            levels,
        })
    }

    /// Location the sounding is valid for.
    #[must_use]
    pub fn location(&self) -> LatLon {
        self.location
    }

    /// Observation / model valid time.
    #[must_use]
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }

    /// The validated levels, surface first.
    #[must_use]
    pub fn levels(&self) -> &[PressureLevelSample] {
        &self.levels
    }

    /// The surface level (highest pressure).
    #[must_use]
    pub fn surface(&self) -> &PressureLevelSample {
        // Validation guarantees at least MIN_LEVELS entries
        &self.levels[0]
    }

    /// Pressure span `[min, max]` covered by the profile (hPa).
    #[must_use]
    pub fn pressure_span_hpa(&self) -> (f64, f64) {
        (
            self.levels[self.levels.len() - 1].pressure_hpa,
            self.levels[0].pressure_hpa,
        )
    }

    /// Linearly interpolate a field at an arbitrary pressure.
    ///
    /// Levels where the requested field is absent are skipped, so the
    /// interpolation brackets with the nearest levels that actually carry
    /// the field. An exact hit on a carrying level returns its value.
    ///
    /// # Errors
    ///
    /// - `SoundingError::PressureOutOfRange` when `pressure_hpa` lies
    ///   outside the span of levels carrying the field.
    /// - `SoundingError::InvalidProfile` when fewer than two levels carry
    ///   the field at all.
    pub fn value_at(&self, pressure_hpa: f64, field: ProfileField) -> Result<f64, SoundingError> {
        let points: Vec<(f64, f64)> = self
            .levels
            .iter()
            .filter_map(|level| {
                let value = match field {
                    ProfileField::Temperature => level.temperature_c,
                    ProfileField::Dewpoint => level.dewpoint_c,
                    ProfileField::Height => level.height_m,
                };
                value.map(|v| (level.pressure_hpa, v))
            })
            .collect();

        if points.len() < 2 {
            return Err(SoundingError::InvalidProfile(format!(
                "fewer than two levels carry {field:?}, cannot interpolate"
            )));
        }

        let max_hpa = points[0].0;
        let min_hpa = points[points.len() - 1].0;
        if pressure_hpa > max_hpa || pressure_hpa < min_hpa {
            return Err(SoundingError::PressureOutOfRange {
                pressure_hpa,
                min_hpa,
                max_hpa,
            });
        }

        // Points are descending in pressure; find the bracketing pair
        for pair in points.windows(2) {
            let (p_hi, v_hi) = pair[0];
            let (p_lo, v_lo) = pair[1];
            if pressure_hpa <= p_hi && pressure_hpa >= p_lo {
                if (p_hi - p_lo).abs() < f64::EPSILON {
                    return Ok(v_hi);
                }
                let t = (p_hi - pressure_hpa) / (p_hi - p_lo);
                return Ok(v_hi + t * (v_lo - v_hi));
            }
        }

        // Unreachable: the span check above brackets every remaining query
        Err(SoundingError::PressureOutOfRange {
            pressure_hpa,
            min_hpa,
            max_hpa,
        })
    }

    /// Rebuild the profile with replacement levels, revalidating.
    ///
    /// Used by the theta-e correction to assemble a corrected profile for
    /// the same location and time.
    ///
    /// # Errors
    ///
    /// Same structural checks as [`ThermodynamicProfile::new`].
    pub fn with_levels(&self, levels: Vec<PressureLevelSample>) -> Result<Self, SoundingError> {
        Self::new(self.location, self.reference_time, levels)
    }
}
