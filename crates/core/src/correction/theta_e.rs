//! Theta-e conserving air-mass correction.
//!
//! Models terrain-induced modification of the lower atmosphere (foehn-type
//! warming and drying) by transporting equivalent potential temperature
//! from an upstream site across the mountain-crossing trajectory. θₑ is
//! conserved through both dry and saturated displacement, which raw
//! temperature and dewpoint are not.
//!
//! The reconstruction is a deliberate hybrid: θₑ alone does not pin down
//! both temperature and moisture, so temperature is fixed by θₑ
//! conservation and moisture by relative-humidity continuity from the
//! windward profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core_types::{LatLon, PressureLevelSample, ProfileField, ThermodynamicProfile};
use crate::correction::windward::{select_windward, Site, WindwardReference, WindwardSelectorConfig};
use crate::errors::SoundingError;
use crate::thermo::adiabat::{dewpoint_from_vapor_pressure, relative_humidity, saturation_vapor_pressure};
use crate::thermo::theta_e::{
    equivalent_potential_temperature, temperature_from_theta_e, ThetaESolverConfig,
};

/// Supplies an already-fetched sounding for a location and time.
///
/// The only I/O seam of the engine: implementations wrap a weather data
/// provider (or a canned profile in tests) and are injected by the caller.
pub trait SoundingSource {
    /// Fetch the profile valid at `location` and `time`.
    ///
    /// # Errors
    ///
    /// `SoundingError::Fetch` (or `InvalidProfile`) when the provider
    /// cannot deliver a usable sounding.
    fn fetch(
        &self,
        location: LatLon,
        time: DateTime<Utc>,
    ) -> Result<ThermodynamicProfile, SoundingError>;
}

/// Tag naming the correction method applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectionMethod {
    /// Lower-band replacement by windward θₑ conservation, upper-band
    /// replacement from a broad-scale reference.
    ThetaEConservation,
}

/// Band thresholds and solver bounds for the correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionConfig {
    /// Levels at or above this pressure form the lower band, fully
    /// replaced from the windward profile (hPa).
    pub lower_band_min_hpa: f64,
    /// Levels below this pressure form the upper band, replaced from the
    /// broad-scale reference (hPa). Between the two thresholds the local
    /// values pass through unchanged.
    pub upper_band_max_hpa: f64,
    /// Windward site qualification window.
    pub windward: WindwardSelectorConfig,
    /// θₑ inversion bounds and tolerance.
    pub solver: ThetaESolverConfig,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            lower_band_min_hpa: 850.0,
            upper_band_max_hpa: 500.0,
            windward: WindwardSelectorConfig::default(),
            solver: ThetaESolverConfig::default(),
        }
    }
}

/// Outcome of one correction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionResult {
    /// The corrected profile, or the original when `applied` is false.
    pub profile: ThermodynamicProfile,
    /// Whether any correction was applied.
    pub applied: bool,
    /// The windward reference used, when one qualified.
    pub windward: Option<WindwardReference>,
    /// Method tag.
    pub method: CorrectionMethod,
    /// Pressures (hPa) of levels where the θₑ inversion failed to
    /// converge, or reference data was missing, and the uncorrected local
    /// value was kept.
    pub low_confidence_levels: Vec<f64>,
}

/// Correct the lower atmosphere of `profile` using θₑ conservation from a
/// windward site, and the upper levels from a broad-scale reference.
///
/// Band layout (defaults): lower ≥ 850 hPa replaced via windward θₑ +
/// windward RH; 500-850 hPa passed through as a mixed-out transition
/// zone; < 500 hPa replaced from `reference_source`, where synoptic flow
/// dominates over local terrain. Values at the band edges can be
/// discontinuous; that is a documented modeling limitation, not smoothed.
///
/// No qualifying windward site yields `applied = false` with the profile
/// returned field-identical, never a fabricated reference. Per-level θₑ
/// non-convergence keeps the local sample and records the level in
/// `low_confidence_levels` without aborting the correction.
///
/// # Errors
///
/// Propagates fetch and structural failures from the injected sources and
/// the rebuilt profile's validation.
pub fn correct(
    profile: &ThermodynamicProfile,
    wind_direction_deg: f64,
    sites: &[Site],
    windward_source: &dyn SoundingSource,
    reference_source: &dyn SoundingSource,
    config: &CorrectionConfig,
) -> Result<CorrectionResult, SoundingError> {
    let Some(windward) = select_windward(
        profile.location(),
        wind_direction_deg,
        sites,
        &config.windward,
    ) else {
        debug!(wind_direction_deg, "no windward reference, correction skipped");
        return Ok(CorrectionResult {
            profile: profile.clone(),
            applied: false,
            windward: None,
            method: CorrectionMethod::ThetaEConservation,
            low_confidence_levels: Vec::new(),
        });
    };

    let windward_profile = windward_source.fetch(windward.location, profile.reference_time())?;
    let reference_profile = reference_source.fetch(profile.location(), profile.reference_time())?;

    let mut corrected = Vec::with_capacity(profile.levels().len());
    let mut low_confidence = Vec::new();

    for level in profile.levels() {
        let p = level.pressure_hpa;
        let sample = if p >= config.lower_band_min_hpa {
            match correct_lower_level(level, &windward_profile, &config.solver) {
                Some(sample) => sample,
                None => {
                    low_confidence.push(p);
                    *level
                }
            }
        } else if p < config.upper_band_max_hpa {
            match replace_from_reference(level, &reference_profile) {
                Some(sample) => sample,
                None => {
                    low_confidence.push(p);
                    *level
                }
            }
        } else {
            // Transition zone: upstream influence assumed mixed out
            *level
        };
        corrected.push(sample);
    }

    let corrected_profile = profile.with_levels(corrected)?;
    debug!(
        site_id = %windward.site_id,
        low_confidence = low_confidence.len(),
        "theta-e correction applied"
    );

    Ok(CorrectionResult {
        profile: corrected_profile,
        applied: true,
        windward: Some(windward),
        method: CorrectionMethod::ThetaEConservation,
        low_confidence_levels: low_confidence,
    })
}

/// Lower band: one level rebuilt from windward θₑ and windward RH.
///
/// Returns `None` when windward data is missing at this pressure or the
/// inversion does not converge; the caller keeps the local sample.
fn correct_lower_level(
    level: &PressureLevelSample,
    windward: &ThermodynamicProfile,
    solver: &ThetaESolverConfig,
) -> Option<PressureLevelSample> {
    let p = level.pressure_hpa;
    let t_wind = windward.value_at(p, ProfileField::Temperature).ok()?;
    let td_wind = windward.value_at(p, ProfileField::Dewpoint).ok()?;

    let theta_e = equivalent_potential_temperature(t_wind, td_wind, p);
    let rh = relative_humidity(t_wind, td_wind);

    let t_corrected = match temperature_from_theta_e(theta_e, p, rh, solver) {
        Ok(t) => t,
        Err(err) => {
            warn!(pressure_hpa = p, %err, "theta-e inversion failed, keeping local value");
            return None;
        }
    };

    // Moisture by RH continuity at the corrected temperature
    let e = rh * saturation_vapor_pressure(t_corrected);
    let td_corrected = if e > 1e-9 {
        dewpoint_from_vapor_pressure(e).min(t_corrected)
    } else {
        solver.t_min_c
    };

    Some(PressureLevelSample {
        pressure_hpa: p,
        temperature_c: Some(t_corrected),
        dewpoint_c: Some(td_corrected),
        height_m: level.height_m,
    })
}

/// Upper band: replace thermal fields from the broad-scale reference.
fn replace_from_reference(
    level: &PressureLevelSample,
    reference: &ThermodynamicProfile,
) -> Option<PressureLevelSample> {
    let p = level.pressure_hpa;
    let t_ref = reference.value_at(p, ProfileField::Temperature).ok()?;
    let td_ref = reference.value_at(p, ProfileField::Dewpoint).ok()?;

    Some(PressureLevelSample {
        pressure_hpa: p,
        temperature_c: Some(t_ref),
        dewpoint_c: Some(td_ref),
        height_m: level.height_m,
    })
}
