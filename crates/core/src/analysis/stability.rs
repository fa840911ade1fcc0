//! Stability indices computed from a full sounding.
//!
//! Rides on the same interpolation and parcel machinery as the cloud
//! level sweep. Both indices are reported as `None` when the profile does
//! not span the mandatory pressure surfaces, which is a data-coverage
//! outcome, not an error.
//!
//! # Scientific References
//!
//! - Galway, J.G. (1956). "The lifted index as a predictor of latent
//!   instability." Bulletin of the AMS, 37, 528-529.
//! - George, J.J. (1960). "Weather Forecasting for Aeronautics."

use crate::analysis::cloud_levels::{detect_cloud_levels, CloudSearchConfig};
use crate::core_types::{ProfileField, ThermodynamicProfile};
use crate::thermo::adiabat::{dry_adiabat, moist_adiabat};

/// Pressure surface the lifted index is evaluated on (hPa).
const LI_SURFACE_HPA: f64 = 500.0;

/// Lifted Index (°C): environment minus parcel temperature at 500 hPa.
///
/// The surface parcel rises dry-adiabatically to its LCL and
/// moist-adiabatically above it; a column too dry to saturate rides the
/// dry adiabat all the way. Negative values indicate instability.
///
/// Returns `None` when the profile does not reach 500 hPa or the surface
/// lacks thermal data.
#[must_use]
pub fn lifted_index(profile: &ThermodynamicProfile, config: &CloudSearchConfig) -> Option<f64> {
    let env_t500 = profile
        .value_at(LI_SURFACE_HPA, ProfileField::Temperature)
        .ok()?;

    let surface = profile.surface();
    let p_sfc = surface.pressure_hpa;
    let t_sfc = surface.temperature_c?;
    if p_sfc <= LI_SURFACE_HPA {
        return None;
    }

    let lcl = detect_cloud_levels(profile, config).ok()?.lcl;
    let parcel_t500 = match lcl {
        Some(mark) if mark.pressure_hpa > LI_SURFACE_HPA => moist_adiabat(
            mark.temperature_c,
            mark.pressure_hpa,
            LI_SURFACE_HPA,
            config.moist_step_hpa,
        ),
        // An LCL at or below 500 hPa means the parcel is still unsaturated
        // at the evaluation surface; dry columns likewise ride the dry
        // adiabat the whole way
        _ => dry_adiabat(t_sfc, p_sfc, LI_SURFACE_HPA),
    };

    Some(env_t500 - parcel_t500)
}

/// K-Index: `(T850 − T500) + Td850 − (T700 − Td700)`.
///
/// Values above ~30 flag high convection potential. `None` when any of
/// the three mandatory surfaces lies outside the profile.
#[must_use]
pub fn k_index(profile: &ThermodynamicProfile) -> Option<f64> {
    let t850 = profile.value_at(850.0, ProfileField::Temperature).ok()?;
    let t700 = profile.value_at(700.0, ProfileField::Temperature).ok()?;
    let t500 = profile.value_at(500.0, ProfileField::Temperature).ok()?;
    let td850 = profile.value_at(850.0, ProfileField::Dewpoint).ok()?;
    let td700 = profile.value_at(700.0, ProfileField::Dewpoint).ok()?;

    Some((t850 - t500) + td850 - (t700 - td700))
}

/// Espy-style LCL height estimate (m AGL): `125 · (T − Td)`.
///
/// A closed-form cross-check for the scanned LCL, not a substitute.
#[must_use]
pub fn lcl_height_estimate_m(t_sfc_c: f64, td_sfc_c: f64) -> f64 {
    125.0 * (t_sfc_c - td_sfc_c).max(0.0)
}
