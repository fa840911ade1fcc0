//! Equivalent potential temperature and its inversion.
//!
//! θₑ is conserved through both dry and saturated (latent-heat-releasing)
//! displacement, which makes it the transport quantity for the windward
//! air-mass correction: temperature is recovered from a target θₑ at a
//! given pressure and relative humidity by a bounded bisection solve.
//!
//! # Scientific References
//!
//! - Bolton, D. (1980). "The computation of equivalent potential
//!   temperature." Monthly Weather Review, 108, 1046-1053 (the simplified
//!   exponential form used here).

use serde::{Deserialize, Serialize};

use crate::errors::ConvergenceError;
use crate::thermo::adiabat::{
    mixing_ratio, saturation_vapor_pressure, KAPPA, LATENT_HEAT_VAPORIZATION, SPECIFIC_HEAT_AIR,
};

const KELVIN_OFFSET: f64 = 273.15;

/// Potential temperature (K): `θ = T_K · (1000 / P)^κ`.
#[must_use]
pub fn potential_temperature(t_c: f64, p_hpa: f64) -> f64 {
    (t_c + KELVIN_OFFSET) * (1000.0 / p_hpa).powf(KAPPA)
}

/// Equivalent potential temperature (K), simplified Bolton form:
/// ```text
/// θₑ = θ · exp(L·q / (cp·T_K))
/// ```
/// with `q` the mixing ratio from the dewpoint.
#[must_use]
pub fn equivalent_potential_temperature(t_c: f64, td_c: f64, p_hpa: f64) -> f64 {
    let theta = potential_temperature(t_c, p_hpa);
    let q = mixing_ratio(td_c, p_hpa);
    theta * (LATENT_HEAT_VAPORIZATION * q / (SPECIFIC_HEAT_AIR * (t_c + KELVIN_OFFSET))).exp()
}

/// Bounds and tolerances for the θₑ → temperature inversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThetaESolverConfig {
    /// Lower edge of the physically plausible search range (°C).
    pub t_min_c: f64,
    /// Upper edge of the physically plausible search range (°C).
    pub t_max_c: f64,
    /// Convergence tolerance on θₑ (K).
    pub tolerance_k: f64,
    /// Iteration cap for the bisection.
    pub max_iterations: usize,
}

impl Default for ThetaESolverConfig {
    fn default() -> Self {
        Self {
            t_min_c: -80.0,
            t_max_c: 60.0,
            tolerance_k: 0.01,
            max_iterations: 60,
        }
    }
}

/// θₑ of air at temperature `t_c` whose moisture is fixed by a relative
/// humidity instead of a dewpoint.
#[must_use]
pub fn theta_e_at_humidity(t_c: f64, rh: f64, p_hpa: f64) -> f64 {
    let e = rh.clamp(0.0, 1.0) * saturation_vapor_pressure(t_c);
    // Guard the log in the dewpoint inversion for bone-dry air
    let td_c = if e > 1e-9 {
        crate::thermo::adiabat::dewpoint_from_vapor_pressure(e)
    } else {
        -90.0
    };
    equivalent_potential_temperature(t_c, td_c, p_hpa)
}

/// Invert θₑ for temperature at a pressure level, holding relative
/// humidity fixed.
///
/// θₑ alone does not pin down both temperature and moisture, so the
/// caller supplies the humidity (taken from the windward profile) and the
/// solve recovers the one temperature consistent with both. θₑ at fixed
/// RH and pressure is monotone increasing in temperature, so bisection
/// over the configured range is safe and bounded.
///
/// # Errors
///
/// `ConvergenceError` when the target lies outside the θₑ values reachable
/// in the search range or the iteration cap is exhausted before the
/// tolerance is met.
pub fn temperature_from_theta_e(
    target_theta_e_k: f64,
    p_hpa: f64,
    rh: f64,
    solver: &ThetaESolverConfig,
) -> Result<f64, ConvergenceError> {
    let fail = |iterations| ConvergenceError {
        target_theta_e_k,
        pressure_hpa: p_hpa,
        iterations,
    };

    let mut lo = solver.t_min_c;
    let mut hi = solver.t_max_c;
    let f = |t_c: f64| theta_e_at_humidity(t_c, rh, p_hpa) - target_theta_e_k;

    // Target must be bracketed by the plausible range
    if f(lo) > 0.0 || f(hi) < 0.0 {
        return Err(fail(0));
    }

    for iteration in 1..=solver.max_iterations {
        let mid = 0.5 * (lo + hi);
        let residual = f(mid);
        if residual.abs() < solver.tolerance_k {
            return Ok(mid);
        }
        if residual > 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
        if iteration == solver.max_iterations {
            return Err(fail(iteration));
        }
    }

    Err(fail(solver.max_iterations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn potential_temperature_reference_values() {
        // At 1000 hPa, θ equals the absolute temperature
        assert_relative_eq!(potential_temperature(20.0, 1000.0), 293.15, epsilon = 1e-9);
        // θ grows with height for the same temperature
        assert!(potential_temperature(20.0, 850.0) > potential_temperature(20.0, 1000.0));
    }

    #[test]
    fn theta_e_exceeds_theta_and_grows_with_moisture() {
        let theta = potential_temperature(20.0, 1000.0);
        let dry = equivalent_potential_temperature(20.0, -10.0, 1000.0);
        let moist = equivalent_potential_temperature(20.0, 18.0, 1000.0);
        assert!(dry > theta, "any vapor content raises theta-e above theta");
        assert!(
            moist > dry + 5.0,
            "moist air should carry substantially more latent heat: {moist:.1} vs {dry:.1}"
        );
    }

    #[test]
    fn theta_e_typical_summer_magnitude() {
        // 20°C / Td 15°C at 1000 hPa is a θₑ near 320 K
        let theta_e = equivalent_potential_temperature(20.0, 15.0, 1000.0);
        assert!(
            (315.0..325.0).contains(&theta_e),
            "expected ~320 K, got {theta_e:.1}"
        );
    }

    #[test]
    fn inversion_recovers_the_forward_temperature() {
        let solver = ThetaESolverConfig::default();
        for (t, td, p) in [(22.0, 16.0, 1000.0), (10.0, 4.0, 900.0), (-5.0, -12.0, 700.0)] {
            let rh = crate::thermo::adiabat::relative_humidity(t, td);
            let target = theta_e_at_humidity(t, rh, p);
            let solved = temperature_from_theta_e(target, p, rh, &solver).unwrap();
            assert!(
                (solved - t).abs() < 0.05,
                "round trip at {p} hPa drifted: {solved:.3} vs {t}"
            );
        }
    }

    #[test]
    fn inversion_rejects_unreachable_targets() {
        let solver = ThetaESolverConfig::default();
        // 1000 K theta-e is outside any plausible tropospheric state
        let err = temperature_from_theta_e(1000.0, 850.0, 0.7, &solver).unwrap_err();
        assert_eq!(err.pressure_hpa, 850.0);

        // Iteration starvation also surfaces as ConvergenceError
        let starved = ThetaESolverConfig {
            max_iterations: 2,
            tolerance_k: 1e-9,
            ..ThetaESolverConfig::default()
        };
        assert!(temperature_from_theta_e(320.0, 850.0, 0.7, &starved).is_err());
    }

    #[test]
    fn inversion_handles_dry_air() {
        let solver = ThetaESolverConfig::default();
        let target = theta_e_at_humidity(15.0, 0.0, 900.0);
        let solved = temperature_from_theta_e(target, 900.0, 0.0, &solver).unwrap();
        assert!(
            (solved - 15.0).abs() < 0.05,
            "zero-humidity inversion drifted to {solved:.3}"
        );
    }
}
