//! Core value types: geographic primitives and the sounding profile.

pub mod geo;
pub mod profile;

pub use geo::{angular_difference_deg, LatLon, EARTH_RADIUS_KM};
pub use profile::{PressureLevelSample, ProfileField, ThermodynamicProfile, MIN_LEVELS};
