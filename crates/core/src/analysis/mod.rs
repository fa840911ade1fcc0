//! Sounding diagnostics: cloud levels, stability indices, parcel curves.

pub mod cloud_levels;
pub mod diagnostics;
pub mod stability;

pub use cloud_levels::{detect_cloud_levels, CloudLevels, CloudSearchConfig, LevelMark};
pub use diagnostics::{analyze, AnalysisConfig, ParcelAdiabats, SoundingAnalysis};
pub use stability::{k_index, lcl_height_estimate_m, lifted_index};
