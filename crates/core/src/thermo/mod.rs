//! Parcel thermodynamics: adiabatic ascent and conserved quantities.
//!
//! Pure functions of their inputs, no shared state, no I/O. Everything
//! iterative is bounded by an explicit step size or iteration cap.

pub mod adiabat;
pub mod theta_e;

pub use adiabat::{
    dewpoint_from_vapor_pressure, dry_adiabat, mixing_ratio, moist_adiabat, relative_humidity,
    saturated_lapse_rate, saturation_mixing_ratio, saturation_vapor_pressure, AdiabatCurve,
    MOIST_ADIABAT_STEP_HPA,
};
pub use theta_e::{
    equivalent_potential_temperature, potential_temperature, temperature_from_theta_e,
    theta_e_at_humidity, ThetaESolverConfig,
};
