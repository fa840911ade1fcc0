//! Dry- and moist-adiabatic parcel paths.
//!
//! Implements the parcel thermodynamics behind cloud-level detection:
//! the closed-form dry adiabat, Tetens saturation quantities, and the
//! numerically integrated saturated (pseudo-adiabatic) ascent.
//!
//! # Scientific References
//!
//! - Poisson's equation for dry-adiabatic ascent, κ = Rd/cp ≈ 0.286
//! - Murray, F.W. (1967). "On the computation of saturation vapor pressure."
//!   Journal of Applied Meteorology, 6, 203-204 (Tetens form).
//! - Rogers, R.R. & Yau, M.K. (1989). "A Short Course in Cloud Physics",
//!   saturated adiabatic lapse rate.

use serde::{Deserialize, Serialize};

/// Latent heat of vaporization (J/kg).
pub const LATENT_HEAT_VAPORIZATION: f64 = 2.5e6;

/// Specific heat of dry air at constant pressure (J/(kg·K)).
pub const SPECIFIC_HEAT_AIR: f64 = 1005.0;

/// Specific gas constant for dry air (J/(kg·K)).
pub const GAS_CONSTANT_DRY_AIR: f64 = 287.05;

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Molecular weight ratio of water vapor to dry air.
pub const EPSILON: f64 = 0.622;

/// Poisson exponent Rd/cp.
pub const KAPPA: f64 = 0.286;

/// Default pressure decrement for moist-adiabat integration (hPa).
///
/// The accuracy knob of the only iterative routine here: halving the step
/// moves the integrated temperature by less than 0.05 °C over a full
/// tropospheric ascent (verified in tests).
pub const MOIST_ADIABAT_STEP_HPA: f64 = 10.0;

/// Celsius/Kelvin offset.
const KELVIN_OFFSET: f64 = 273.15;

/// Temperature of a dry-adiabatically displaced parcel (°C).
///
/// Closed form from Poisson's equation:
/// ```text
/// T(P) = (T₀ + 273.15) · (P / P₀)^κ − 273.15
/// ```
///
/// Exact identity at the starting level: `dry_adiabat(t, p, p) == t`.
#[must_use]
pub fn dry_adiabat(t0_c: f64, p0_hpa: f64, p_hpa: f64) -> f64 {
    (t0_c + KELVIN_OFFSET) * (p_hpa / p0_hpa).powf(KAPPA) - KELVIN_OFFSET
}

/// Saturation vapor pressure over water (hPa), Tetens form:
/// ```text
/// es(T) = 6.112 · exp(17.67·T / (T + 243.5))
/// ```
#[must_use]
pub fn saturation_vapor_pressure(t_c: f64) -> f64 {
    6.112 * (17.67 * t_c / (t_c + 243.5)).exp()
}

/// Dewpoint implied by a vapor pressure (°C), the inverse Tetens form.
#[must_use]
pub fn dewpoint_from_vapor_pressure(e_hpa: f64) -> f64 {
    let ln_ratio = (e_hpa / 6.112).ln();
    243.5 * ln_ratio / (17.67 - ln_ratio)
}

/// Saturation mixing ratio (kg/kg) at temperature `t_c` and pressure `p_hpa`:
/// `ws = ε·es / (P − es)`.
#[must_use]
pub fn saturation_mixing_ratio(t_c: f64, p_hpa: f64) -> f64 {
    let es = saturation_vapor_pressure(t_c);
    EPSILON * es / (p_hpa - es)
}

/// Actual mixing ratio (kg/kg) from the dewpoint.
#[must_use]
pub fn mixing_ratio(td_c: f64, p_hpa: f64) -> f64 {
    saturation_mixing_ratio(td_c, p_hpa)
}

/// Relative humidity (0-1) from temperature and dewpoint.
#[must_use]
pub fn relative_humidity(t_c: f64, td_c: f64) -> f64 {
    let es = saturation_vapor_pressure(t_c);
    if es <= 0.0 {
        return 0.0;
    }
    (saturation_vapor_pressure(td_c) / es).clamp(0.0, 1.0)
}

/// Saturated adiabatic lapse rate (K/m) at the current parcel state.
///
/// ```text
/// Γs = g · (1 + L·ws/(Rd·T)) / (cp + L²·ws·ε/(Rd·T²))
/// ```
#[must_use]
pub fn saturated_lapse_rate(t_c: f64, p_hpa: f64) -> f64 {
    let t_k = t_c + KELVIN_OFFSET;
    let ws = saturation_mixing_ratio(t_c, p_hpa);

    let numerator = GRAVITY
        * (1.0 + LATENT_HEAT_VAPORIZATION * ws / (GAS_CONSTANT_DRY_AIR * t_k));
    let denominator = SPECIFIC_HEAT_AIR
        + LATENT_HEAT_VAPORIZATION.powi(2) * ws * EPSILON / (GAS_CONSTANT_DRY_AIR * t_k * t_k);

    numerator / denominator
}

/// Saturated cooling per hPa of descent in pressure (°C/hPa), the lapse
/// rate converted through the hydrostatic relation `dz = Rd·T/(g·P) · dP`.
fn saturated_cooling_per_hpa(t_c: f64, p_hpa: f64) -> f64 {
    let t_k = t_c + KELVIN_OFFSET;
    saturated_lapse_rate(t_c, p_hpa) * GAS_CONSTANT_DRY_AIR * t_k / (GRAVITY * p_hpa)
}

/// Temperature of a saturated parcel lifted from `(t0_c, p0_hpa)` to
/// `p1_hpa` (°C), integrating the saturated lapse rate in fixed pressure
/// decrements.
///
/// Each step is a midpoint (second-order) update: the cooling rate is
/// re-evaluated at the half-step state before the full decrement is
/// taken, so the slow drift of the lapse rate along the ascent does not
/// accumulate into a first-order error. The routine never fails; a
/// coarser `step_hpa` only reduces accuracy, and a non-positive step
/// falls back to [`MOIST_ADIABAT_STEP_HPA`].
#[must_use]
pub fn moist_adiabat(t0_c: f64, p0_hpa: f64, p1_hpa: f64, step_hpa: f64) -> f64 {
    let step_hpa = if step_hpa > 0.0 {
        step_hpa
    } else {
        MOIST_ADIABAT_STEP_HPA
    };
    if p1_hpa >= p0_hpa {
        return t0_c;
    }

    let mut t_c = t0_c;
    let mut p_hpa = p0_hpa;

    while p_hpa > p1_hpa {
        let dp = step_hpa.min(p_hpa - p1_hpa);

        let k1 = saturated_cooling_per_hpa(t_c, p_hpa);
        let t_mid = t_c - k1 * (0.5 * dp);
        let k2 = saturated_cooling_per_hpa(t_mid, p_hpa - 0.5 * dp);

        t_c -= k2 * dp;
        p_hpa -= dp;
    }

    t_c
}

/// One parcel path as ordered `(pressure hPa, temperature °C)` pairs,
/// starting level first, pressure decreasing upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdiabatCurve {
    /// Sampled points along the ascent.
    pub points: Vec<(f64, f64)>,
}

impl AdiabatCurve {
    /// Sample a dry adiabat from `(t0_c, p0_hpa)` down to `p_end_hpa`.
    #[must_use]
    pub fn dry(t0_c: f64, p0_hpa: f64, p_end_hpa: f64, step_hpa: f64) -> Self {
        let step_hpa = if step_hpa > 0.0 {
            step_hpa
        } else {
            MOIST_ADIABAT_STEP_HPA
        };
        let mut points = Vec::new();
        let mut p = p0_hpa;
        loop {
            points.push((p, dry_adiabat(t0_c, p0_hpa, p)));
            if p <= p_end_hpa {
                break;
            }
            p = (p - step_hpa).max(p_end_hpa);
        }
        Self { points }
    }

    /// Sample a moist adiabat from `(t0_c, p0_hpa)` down to `p_end_hpa`,
    /// reusing the running integration state between samples.
    #[must_use]
    pub fn moist(t0_c: f64, p0_hpa: f64, p_end_hpa: f64, step_hpa: f64) -> Self {
        let step_hpa = if step_hpa > 0.0 {
            step_hpa
        } else {
            MOIST_ADIABAT_STEP_HPA
        };
        let mut points = vec![(p0_hpa, t0_c)];
        let mut t = t0_c;
        let mut p = p0_hpa;
        while p > p_end_hpa {
            let next = (p - step_hpa).max(p_end_hpa);
            t = moist_adiabat(t, p, next, step_hpa);
            p = next;
            points.push((p, t));
        }
        Self { points }
    }
}
