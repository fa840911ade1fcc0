//! Correction Pipeline Integration
//!
//! End-to-end exercises of the windward theta-e correction followed by
//! the same diagnostic pipeline on the corrected profile, the way the
//! advisory application consumes this engine.
//!
//! Scenario: westerly flow across a 1721 m volcanic island. The east
//! coast sounding is corrected with the west coast (windward) air mass;
//! foehn descent on the lee side should show warming and drying in the
//! lower band while the upper levels follow the synoptic reference.

use chrono::{DateTime, TimeZone, Utc};
use sounding_core::analysis::{analyze, AnalysisConfig};
use sounding_core::correction::{correct, CorrectionConfig, Site, SoundingSource};
use sounding_core::core_types::{LatLon, PressureLevelSample, ProfileField};
use sounding_core::thermo::{equivalent_potential_temperature, relative_humidity};
use sounding_core::{SoundingError, ThermodynamicProfile};

/// Test double returning one canned profile.
struct CannedSource(ThermodynamicProfile);

impl SoundingSource for CannedSource {
    fn fetch(
        &self,
        _location: LatLon,
        _time: DateTime<Utc>,
    ) -> Result<ThermodynamicProfile, SoundingError> {
        Ok(self.0.clone())
    }
}

fn valid_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 15, 0, 0, 0).unwrap()
}

/// Lee-side (east coast) sounding: cool and moist near the surface.
fn leeward_profile() -> ThermodynamicProfile {
    ThermodynamicProfile::new(
        LatLon::new(45.242, 141.242),
        valid_time(),
        vec![
            PressureLevelSample::new(1000.0, 18.0, 15.0, 110.0),
            PressureLevelSample::new(925.0, 14.0, 11.0, 780.0),
            PressureLevelSample::new(850.0, 10.0, 7.0, 1480.0),
            PressureLevelSample::new(700.0, 2.0, -6.0, 3050.0),
            PressureLevelSample::new(500.0, -16.0, -26.0, 5750.0),
            PressureLevelSample::new(300.0, -42.0, -55.0, 9300.0),
        ],
    )
    .unwrap()
}

/// Windward (west coast) sounding: a warmer, drier continental air mass.
fn windward_profile() -> ThermodynamicProfile {
    ThermodynamicProfile::new(
        LatLon::new(45.163, 141.143),
        valid_time(),
        vec![
            PressureLevelSample::new(1000.0, 24.0, 13.0, 110.0),
            PressureLevelSample::new(925.0, 19.0, 9.0, 780.0),
            PressureLevelSample::new(850.0, 14.0, 5.0, 1480.0),
            PressureLevelSample::new(700.0, 4.0, -6.0, 3050.0),
            PressureLevelSample::new(500.0, -14.0, -25.0, 5750.0),
            PressureLevelSample::new(300.0, -41.0, -54.0, 9300.0),
        ],
    )
    .unwrap()
}

/// Broad-scale upper-air reference (model analysis).
fn synoptic_reference() -> ThermodynamicProfile {
    ThermodynamicProfile::new(
        LatLon::new(45.242, 141.242),
        valid_time(),
        vec![
            PressureLevelSample::new(1000.0, 19.0, 14.0, 110.0),
            PressureLevelSample::new(700.0, 1.0, -8.0, 3050.0),
            PressureLevelSample::new(500.0, -17.0, -28.0, 5750.0),
            PressureLevelSample::new(300.0, -44.0, -58.0, 9300.0),
        ],
    )
    .unwrap()
}

fn island_registry() -> Vec<Site> {
    vec![
        Site {
            id: "kutsugata".into(),
            location: LatLon::new(45.163, 141.143),
        },
        Site {
            id: "oniwaki".into(),
            location: LatLon::new(45.108, 141.290),
        },
    ]
}

#[test]
fn corrected_profile_flows_through_the_same_pipeline() {
    let local = leeward_profile();
    let result = correct(
        &local,
        220.0, // southwesterly: Kutsugata is upwind
        &island_registry(),
        &CannedSource(windward_profile()),
        &CannedSource(synoptic_reference()),
        &CorrectionConfig::default(),
    )
    .unwrap();

    assert!(result.applied);
    assert_eq!(result.windward.as_ref().unwrap().site_id, "kutsugata");

    // The corrected profile is a valid sounding and analyzable as-is
    let diagnostics = analyze(&result.profile, &AnalysisConfig::default()).unwrap();

    // Either diagnostic outcome is legitimate, but the call must succeed
    // and the pressure ordering invariant must hold when levels exist
    if let (Some(lcl), Some(lfc)) = (diagnostics.cloud_levels.lcl, diagnostics.cloud_levels.lfc) {
        assert!(lcl.pressure_hpa >= lfc.pressure_hpa);
    }
}

#[test]
fn foehn_correction_warms_and_dries_the_lee_lower_band() {
    let local = leeward_profile();
    let windward = windward_profile();
    let result = correct(
        &local,
        220.0,
        &island_registry(),
        &CannedSource(windward.clone()),
        &CannedSource(synoptic_reference()),
        &CorrectionConfig::default(),
    )
    .unwrap();

    for (corrected, original) in result.profile.levels().iter().zip(local.levels()).take(3) {
        let p = corrected.pressure_hpa;
        let t_new = corrected.temperature_c.unwrap();
        let t_old = original.temperature_c.unwrap();
        assert!(
            t_new > t_old,
            "warmer windward air mass should warm {p} hPa: {t_new:.1} vs {t_old:.1}"
        );

        // Drying: the windward air mass carries lower relative humidity
        let rh_new = relative_humidity(t_new, corrected.dewpoint_c.unwrap());
        let rh_old = relative_humidity(t_old, original.dewpoint_c.unwrap());
        assert!(
            rh_new < rh_old,
            "foehn correction should dry {p} hPa: RH {rh_new:.2} vs {rh_old:.2}"
        );

        // Conservation: corrected theta-e matches the windward value
        let theta_e_corrected =
            equivalent_potential_temperature(t_new, corrected.dewpoint_c.unwrap(), p);
        let theta_e_windward = equivalent_potential_temperature(
            windward.value_at(p, ProfileField::Temperature).unwrap(),
            windward.value_at(p, ProfileField::Dewpoint).unwrap(),
            p,
        );
        assert!(
            (theta_e_corrected - theta_e_windward).abs() < 0.5,
            "theta-e drifted at {p} hPa: {theta_e_corrected:.2} vs {theta_e_windward:.2}"
        );
    }

    // Upper band follows the synoptic reference, not the windward site
    let level300 = result.profile.levels()[5];
    assert_eq!(level300.temperature_c, Some(-44.0));
    assert_eq!(level300.dewpoint_c, Some(-58.0));

    // Middle band untouched
    assert_eq!(result.profile.levels()[3], local.levels()[3]);
}

#[test]
fn correction_skip_keeps_diagnostics_identical() {
    let local = leeward_profile();
    // Easterly wind: no site lies upwind of the east coast target
    let result = correct(
        &local,
        90.0,
        &island_registry(),
        &CannedSource(windward_profile()),
        &CannedSource(synoptic_reference()),
        &CorrectionConfig::default(),
    )
    .unwrap();

    assert!(!result.applied);
    let before = analyze(&local, &AnalysisConfig::default()).unwrap();
    let after = analyze(&result.profile, &AnalysisConfig::default()).unwrap();
    assert_eq!(
        before, after,
        "skipped correction must leave diagnostics untouched"
    );
}

#[test]
fn synthetic_band_thresholds_move_the_correction_boundary() {
    let local = leeward_profile();
    // Push the lower band up to 700 hPa: one more level gets corrected
    let config = CorrectionConfig {
        lower_band_min_hpa: 700.0,
        ..CorrectionConfig::default()
    };
    let result = correct(
        &local,
        220.0,
        &island_registry(),
        &CannedSource(windward_profile()),
        &CannedSource(synoptic_reference()),
        &config,
    )
    .unwrap();

    // 700 hPa now tracks the windward air mass (4 °C there, vs local 2 °C)
    let t700 = result.profile.levels()[3].temperature_c.unwrap();
    assert!(
        (t700 - 4.0).abs() < 0.2,
        "700 hPa should be corrected under the synthetic threshold, got {t700:.2}"
    );
}
