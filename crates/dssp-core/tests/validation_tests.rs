use dssp_core::prelude::*;
use dssp_test_utils::{
    catchment, homes, sanitary_scenario, setup_test_orchestrator, storm_scenario, water_scenario,
};

#[test]
fn test_unsupported_return_period() {
    let orchestrator = setup_test_orchestrator();
    for years in [0, 1, 3, 20, 200] {
        let request = StormPipeRequest {
            return_period_years: years,
            ..storm_scenario()
        };
        let err = orchestrator.design_storm_pipe(&request).unwrap_err();
        assert!(matches!(err, DesignError::UnsupportedReturnPeriod(_)), "{years}");
        assert_eq!(err.field(), Some("return_period_years"));
    }
}

#[test]
fn test_every_registered_return_period_designs() {
    let orchestrator = setup_test_orchestrator();
    for years in [2, 5, 10, 25, 50, 100] {
        let request = StormPipeRequest {
            return_period_years: years,
            ..storm_scenario()
        };
        assert!(orchestrator.design_storm_pipe(&request).is_ok(), "{years}");
    }
}

#[test]
fn test_zero_area_catchment() {
    let orchestrator = setup_test_orchestrator();
    let request = StormPipeRequest {
        catchments: vec![catchment(0.0, LandUse::SingleFamily, 200.0, 2.0)],
        ..storm_scenario()
    };
    let err = orchestrator.design_storm_pipe(&request).unwrap_err();
    assert_eq!(err.field(), Some("area_ha"));
    assert!(!err.is_configuration());
}

#[test]
fn test_empty_catchment_list() {
    let orchestrator = setup_test_orchestrator();
    let request = StormPipeRequest {
        catchments: vec![],
        ..storm_scenario()
    };
    let err = orchestrator.design_storm_pipe(&request).unwrap_err();
    assert_eq!(err.field(), Some("catchments"));
}

#[test]
fn test_runoff_override_out_of_range() {
    let orchestrator = setup_test_orchestrator();
    let mut input = catchment(1.0, LandUse::Park, 100.0, 1.0);
    input.runoff_c = Some(1.5);
    let request = StormPipeRequest {
        catchments: vec![input],
        ..storm_scenario()
    };
    let err = orchestrator.design_storm_pipe(&request).unwrap_err();
    assert_eq!(err.field(), Some("runoff_c"));
}

#[test]
fn test_load_without_basis() {
    let orchestrator = setup_test_orchestrator();
    let mut load = homes(10, 1.0);
    load.dwelling_units = None;
    let request = SanitaryPipeRequest {
        loads: vec![load],
        ..sanitary_scenario()
    };
    let err = orchestrator.design_sanitary_pipe(&request).unwrap_err();
    assert!(matches!(
        err,
        DesignError::Hydrology(dssp_hydrology::HydrologyError::InvalidLoadInput { .. })
    ));
}

#[test]
fn test_non_positive_fixed_slope() {
    let orchestrator = setup_test_orchestrator();
    let request = SanitaryPipeRequest {
        slope_percent: Some(SlopePercent::new(-0.5)),
        ..sanitary_scenario()
    };
    let err = orchestrator.design_sanitary_pipe(&request).unwrap_err();
    assert_eq!(err.field(), Some("slope_percent"));
}

#[test]
fn test_minimum_diameter_above_ladder() {
    let orchestrator = setup_test_orchestrator();
    let request = StormPipeRequest {
        min_diameter_mm: Some(Millimetres::new(2400.0)),
        ..storm_scenario()
    };
    let err = orchestrator.design_storm_pipe(&request).unwrap_err();
    assert_eq!(err.field(), Some("min_diameter_mm"));
}

#[test]
fn test_zero_length_water_service() {
    let orchestrator = setup_test_orchestrator();
    let request = WaterServiceRequest {
        length_m: Metres::new(0.0),
        ..water_scenario()
    };
    let err = orchestrator.design_water_service(&request).unwrap_err();
    assert_eq!(err.field(), Some("length_m"));
}

#[test]
fn test_material_without_roughness_is_configuration_error() {
    let orchestrator = setup_test_orchestrator();
    let request = WaterServiceRequest {
        material: Material::CorrugatedSteel,
        ..water_scenario()
    };
    let err = orchestrator.design_water_service(&request).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_unknown_keys_fail_deserialization() {
    let json = r#"{
        "pipe_id": "SA-1",
        "loads": [{"land_use": "single_family", "area_ha": 1.0, "dwelling_units": 4}],
        "material": "bamboo"
    }"#;
    let err = serde_json::from_str::<SanitaryPipeRequest>(json).unwrap_err();
    assert!(err.to_string().contains("bamboo"));
}
