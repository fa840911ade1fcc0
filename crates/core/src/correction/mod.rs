//! Windward site selection and theta-e conserving profile correction.

pub mod theta_e;
pub mod windward;

pub use theta_e::{
    correct, CorrectionConfig, CorrectionMethod, CorrectionResult, SoundingSource,
};
pub use windward::{select_windward, Site, WindwardReference, WindwardSelectorConfig};
