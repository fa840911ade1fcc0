//! Cloud level detection: LCL, LFC, and EL from a single upward sweep.
//!
//! A surface parcel is lifted dry-adiabatically until its saturation
//! mixing ratio meets the conserved surface vapor content (LCL), then
//! moist-adiabatically against the environment to find where it first
//! becomes buoyant (LFC) and where buoyancy is capped again (EL).
//!
//! Absence of any of the three levels is a legitimate meteorological
//! outcome, reported as `None`, never as an error.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core_types::{ProfileField, ThermodynamicProfile};
use crate::errors::SoundingError;
use crate::thermo::adiabat::{
    dry_adiabat, mixing_ratio, moist_adiabat, saturation_mixing_ratio, MOIST_ADIABAT_STEP_HPA,
};

/// A detected level: pressure and the parcel temperature there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelMark {
    /// Pressure of the level (hPa).
    pub pressure_hpa: f64,
    /// Parcel temperature at the level (°C).
    pub temperature_c: f64,
}

/// Cloud levels from one parcel ascent. Each field is independently
/// present or absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CloudLevels {
    /// Lifting condensation level.
    pub lcl: Option<LevelMark>,
    /// Level of free convection.
    pub lfc: Option<LevelMark>,
    /// Equilibrium level.
    pub el: Option<LevelMark>,
}

/// Search bounds and tolerances for the cloud level sweep.
///
/// Explicit configuration rather than module constants, so tests can run
/// with synthetic thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudSearchConfig {
    /// Pressure decrement per candidate level in the LCL scan (hPa).
    pub step_hpa: f64,
    /// Floor pressure for the LCL scan; a column still unsaturated here
    /// is reported without an LCL (degenerate, very dry column).
    pub lcl_floor_hpa: f64,
    /// Ceiling pressure for the LFC/EL sweep (hPa).
    pub ceiling_hpa: f64,
    /// Relative tolerance for the saturation match at the LCL.
    pub saturation_tolerance: f64,
    /// Step size handed to the moist-adiabat integration (hPa).
    pub moist_step_hpa: f64,
}

impl Default for CloudSearchConfig {
    fn default() -> Self {
        Self {
            step_hpa: 5.0,
            lcl_floor_hpa: 300.0,
            ceiling_hpa: 100.0,
            saturation_tolerance: 0.01,
            moist_step_hpa: MOIST_ADIABAT_STEP_HPA,
        }
    }
}

/// Detect LCL, LFC, and EL for a surface parcel of `profile`.
///
/// # Errors
///
/// `SoundingError::InvalidProfile` when the surface level lacks
/// temperature or dewpoint; the sweep itself never errors, it reports
/// absences.
pub fn detect_cloud_levels(
    profile: &ThermodynamicProfile,
    config: &CloudSearchConfig,
) -> Result<CloudLevels, SoundingError> {
    let surface = profile.surface();
    let p_sfc = surface.pressure_hpa;
    let t_sfc = surface.temperature_c.ok_or_else(|| {
        SoundingError::InvalidProfile("surface level has no temperature".into())
    })?;
    let td_sfc = surface.dewpoint_c.ok_or_else(|| {
        SoundingError::InvalidProfile("surface level has no dewpoint".into())
    })?;

    let lcl = find_lcl(t_sfc, td_sfc, p_sfc, config);

    let (lfc, el) = match lcl {
        Some(mark) => sweep_lfc_el(profile, mark, config),
        None => {
            debug!(
                floor_hpa = config.lcl_floor_hpa,
                "no saturation by the scan floor, dry column without an LCL"
            );
            (None, None)
        }
    };

    Ok(CloudLevels { lcl, lfc, el })
}

/// Scan downward in pressure for the first level where the dry-lifted
/// parcel saturates against its conserved vapor mixing ratio.
fn find_lcl(t_sfc_c: f64, td_sfc_c: f64, p_sfc_hpa: f64, config: &CloudSearchConfig) -> Option<LevelMark> {
    // Already saturated at the surface: LCL is the surface level
    if td_sfc_c >= t_sfc_c {
        return Some(LevelMark {
            pressure_hpa: p_sfc_hpa,
            temperature_c: t_sfc_c,
        });
    }

    let parcel_vapor = mixing_ratio(td_sfc_c, p_sfc_hpa);

    let mut p = p_sfc_hpa;
    while p >= config.lcl_floor_hpa {
        let parcel_t = dry_adiabat(t_sfc_c, p_sfc_hpa, p);
        let ws = saturation_mixing_ratio(parcel_t, p);

        // Saturation: parcel's ws has cooled down to the conserved vapor
        // content, either within tolerance or crossed below it
        let relative_gap = (ws - parcel_vapor) / parcel_vapor;
        if relative_gap.abs() <= config.saturation_tolerance || ws < parcel_vapor {
            debug!(pressure_hpa = p, temperature_c = parcel_t, "LCL found");
            return Some(LevelMark {
                pressure_hpa: p,
                temperature_c: parcel_t,
            });
        }
        p -= config.step_hpa;
    }

    None
}

/// Sweep a saturated parcel upward from the LCL, tracking the sign of
/// (parcel − environment).
///
/// Returns (LFC, EL): LFC at the first negative-to-positive transition,
/// EL at the first positive-to-negative transition after the LFC. Earlier
/// or later sign changes are ignored, per standard convention. The sweep
/// ends at the configured ceiling or at the top of the environment
/// profile, whichever comes first.
fn sweep_lfc_el(
    profile: &ThermodynamicProfile,
    lcl: LevelMark,
    config: &CloudSearchConfig,
) -> (Option<LevelMark>, Option<LevelMark>) {
    let mut lfc: Option<LevelMark> = None;
    let mut parcel_t = lcl.temperature_c;
    let mut p = lcl.pressure_hpa;
    let mut previous_sign: Option<bool> = None; // true = parcel warmer

    while p >= config.ceiling_hpa {
        // Above the profile top there is nothing to compare against
        let Ok(env_t) = profile.value_at(p, ProfileField::Temperature) else {
            break;
        };

        let buoyant = parcel_t > env_t;
        match (previous_sign, buoyant, lfc) {
            // Buoyant already at the LCL: free convection starts there
            (None, true, None) => {
                debug!(pressure_hpa = p, "parcel buoyant at the LCL, LFC = LCL");
                lfc = Some(LevelMark {
                    pressure_hpa: p,
                    temperature_c: parcel_t,
                });
            }
            // First negative-to-positive transition is the LFC
            (Some(false), true, None) => {
                debug!(pressure_hpa = p, "LFC found");
                lfc = Some(LevelMark {
                    pressure_hpa: p,
                    temperature_c: parcel_t,
                });
            }
            // First positive-to-negative transition after the LFC is the EL
            (Some(true), false, Some(_)) => {
                debug!(pressure_hpa = p, "EL found");
                return (
                    lfc,
                    Some(LevelMark {
                        pressure_hpa: p,
                        temperature_c: parcel_t,
                    }),
                );
            }
            _ => {}
        }
        previous_sign = Some(buoyant);

        let next = p - config.step_hpa;
        parcel_t = moist_adiabat(parcel_t, p, next, config.moist_step_hpa);
        p = next;
    }

    // Ceiling (or profile top) reached: LFC without a later reversal means
    // an unbounded buoyant layer, reported with EL absent
    (lfc, None)
}
