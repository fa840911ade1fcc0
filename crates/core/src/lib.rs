//! Atmospheric Sounding Analysis Core
//!
//! Thermodynamic diagnostics for a single vertical sounding: parcel
//! ascent curves, cloud base / free convection / cloud top levels, and an
//! optional lower-atmosphere correction that transports equivalent
//! potential temperature from a windward reference site to model
//! terrain-induced air-mass modification (foehn-type warming and drying).
//!
//! ## Design
//!
//! All routines are pure functions of their inputs: no shared state, no
//! internal locking, no suspension points. The only I/O (fetching
//! soundings) sits behind the [`correction::SoundingSource`] trait and is
//! injected by the caller. Independent (location, time) requests can be
//! computed fully in parallel with no coordination.
//!
//! ```no_run
//! use sounding_core::analysis::{analyze, AnalysisConfig};
//! # fn profile() -> sounding_core::core_types::ThermodynamicProfile { unimplemented!() }
//!
//! let profile = profile(); // already fetched by the data provider
//! let diagnostics = analyze(&profile, &AnalysisConfig::default())?;
//! if let Some(lcl) = diagnostics.cloud_levels.lcl {
//!     println!("cloud base near {:.0} hPa", lcl.pressure_hpa);
//! }
//! # Ok::<(), sounding_core::errors::SoundingError>(())
//! ```

// Leaf value types
pub mod core_types;

// Error taxonomy
pub mod errors;

// Parcel thermodynamics (dry/moist adiabats, theta-e)
pub mod thermo;

// Diagnostics over one profile
pub mod analysis;

// Windward selection and theta-e correction
pub mod correction;

// Re-export core types
pub use core_types::{LatLon, PressureLevelSample, ProfileField, ThermodynamicProfile};
pub use errors::{ConvergenceError, SoundingError};

// Re-export the exposed operations
pub use analysis::{analyze, AnalysisConfig, CloudLevels, SoundingAnalysis};
pub use correction::{
    correct, CorrectionConfig, CorrectionResult, Site, SoundingSource, WindwardReference,
};
