//! The `analyze` entry point: one sounding in, diagnostics out.

use serde::{Deserialize, Serialize};

use crate::analysis::cloud_levels::{detect_cloud_levels, CloudLevels, CloudSearchConfig};
use crate::analysis::stability::{k_index, lifted_index};
use crate::core_types::ThermodynamicProfile;
use crate::errors::SoundingError;
use crate::thermo::adiabat::AdiabatCurve;

/// Configuration for a full sounding analysis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Bounds and tolerances for the cloud level sweep.
    pub cloud: CloudSearchConfig,
    /// Also sample the parcel's dry/moist adiabat curves for plotting.
    pub with_adiabats: bool,
}

/// The surface parcel's sampled ascent curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelAdiabats {
    /// Dry ascent from the surface to the LCL (or the scan floor when no
    /// LCL was found).
    pub dry: AdiabatCurve,
    /// Saturated ascent from the LCL to the sweep ceiling; absent for a
    /// column without an LCL.
    pub moist: Option<AdiabatCurve>,
}

/// Diagnostics for one profile at one location and time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundingAnalysis {
    /// LCL / LFC / EL, each independently optional.
    pub cloud_levels: CloudLevels,
    /// Parcel curves, when requested.
    pub adiabats: Option<ParcelAdiabats>,
    /// Lifted index (°C), absent when the profile stops short of 500 hPa.
    pub lifted_index: Option<f64>,
    /// K-index, absent when 850/700/500 hPa are not all covered.
    pub k_index: Option<f64>,
}

/// Analyze one sounding: cloud levels, stability indices, and optionally
/// the parcel adiabat curves.
///
/// Pure function of its inputs; independent invocations may run in
/// parallel with no coordination.
///
/// # Errors
///
/// `SoundingError::InvalidProfile` when the surface level lacks the
/// thermal data the parcel ascent starts from.
pub fn analyze(
    profile: &ThermodynamicProfile,
    config: &AnalysisConfig,
) -> Result<SoundingAnalysis, SoundingError> {
    let cloud_levels = detect_cloud_levels(profile, &config.cloud)?;

    let adiabats = if config.with_adiabats {
        let surface = profile.surface();
        let t_sfc = surface.temperature_c.ok_or_else(|| {
            SoundingError::InvalidProfile("surface level has no temperature".into())
        })?;
        let p_sfc = surface.pressure_hpa;

        let dry_end = cloud_levels
            .lcl
            .map_or(config.cloud.lcl_floor_hpa, |lcl| lcl.pressure_hpa);
        let dry = AdiabatCurve::dry(t_sfc, p_sfc, dry_end, config.cloud.step_hpa);
        let moist = cloud_levels.lcl.map(|lcl| {
            AdiabatCurve::moist(
                lcl.temperature_c,
                lcl.pressure_hpa,
                config.cloud.ceiling_hpa,
                config.cloud.moist_step_hpa,
            )
        });
        Some(ParcelAdiabats { dry, moist })
    } else {
        None
    };

    Ok(SoundingAnalysis {
        cloud_levels,
        adiabats,
        lifted_index: lifted_index(profile, &config.cloud),
        k_index: k_index(profile),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{LatLon, PressureLevelSample};
    use chrono::{TimeZone, Utc};

    fn summer_profile() -> ThermodynamicProfile {
        ThermodynamicProfile::new(
            LatLon::new(45.178, 141.228),
            Utc.with_ymd_and_hms(2025, 7, 15, 0, 0, 0).unwrap(),
            vec![
                PressureLevelSample::new(1000.0, 20.0, 15.0, 110.0),
                PressureLevelSample::new(925.0, 16.0, 11.0, 780.0),
                PressureLevelSample::new(850.0, 12.0, 6.0, 1480.0),
                PressureLevelSample::new(700.0, 2.0, -6.0, 3050.0),
                PressureLevelSample::new(500.0, -16.0, -26.0, 5750.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn analyze_returns_all_requested_diagnostics() {
        let config = AnalysisConfig {
            with_adiabats: true,
            ..AnalysisConfig::default()
        };
        let analysis = analyze(&summer_profile(), &config).unwrap();

        let lcl = analysis.cloud_levels.lcl.expect("moist column saturates");
        let adiabats = analysis.adiabats.expect("curves were requested");

        // Dry curve runs surface → LCL, moist curve starts at the LCL
        assert_eq!(adiabats.dry.points.first().unwrap().0, 1000.0);
        assert_eq!(adiabats.dry.points.last().unwrap().0, lcl.pressure_hpa);
        let moist = adiabats.moist.expect("LCL found, moist curve expected");
        assert_eq!(moist.points.first().unwrap().0, lcl.pressure_hpa);

        assert!(analysis.lifted_index.is_some());
        assert!(analysis.k_index.is_some());
    }

    #[test]
    fn analyze_skips_curves_when_not_requested() {
        let analysis = analyze(&summer_profile(), &AnalysisConfig::default()).unwrap();
        assert!(analysis.adiabats.is_none());
        assert!(analysis.cloud_levels.lcl.is_some());
    }
}
