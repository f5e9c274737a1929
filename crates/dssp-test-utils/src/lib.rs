//! Testing utilities for the DSSP workspace
//!
//! Reference scenario requests, builders and float assertions.

#![allow(missing_docs)]

use dssp_core::{
    CatchmentInput, DesignOrchestrator, LoadInput, SanitaryPipeRequest, StormPipeRequest,
    WaterServiceRequest,
};
use dssp_hydrology::{FireFlowDemand, TcMethod};
use dssp_standards::{
    Hectares, Kilopascals, LandUse, Material, Metres, Millimetres, SlopePercent, StandardsTable,
};
use std::sync::Arc;

pub fn setup_test_orchestrator() -> DesignOrchestrator {
    DesignOrchestrator::new(Arc::new(StandardsTable::builtin()))
}

pub fn catchment(
    area_ha: f64,
    land_use: LandUse,
    length_m: f64,
    slope_percent: f64,
) -> CatchmentInput {
    CatchmentInput {
        id: None,
        area_ha: Hectares::new(area_ha),
        land_use,
        runoff_c: None,
        flow_path_length_m: Some(Metres::new(length_m)),
        average_slope_percent: Some(SlopePercent::new(slope_percent)),
        tc_method: TcMethod::Kirpich,
        tc_minutes: None,
    }
}

pub fn homes(dwelling_units: u32, area_ha: f64) -> LoadInput {
    LoadInput {
        id: None,
        land_use: LandUse::SingleFamily,
        area_ha: Hectares::new(area_ha),
        dwelling_units: Some(dwelling_units),
        population: None,
        employees: None,
    }
}

/// 2.5 ha single-family lot, 200 m at 2 %, 5-year storm, PVC, 300 mm minimum
pub fn storm_scenario() -> StormPipeRequest {
    StormPipeRequest {
        pipe_id: "ST-101".to_string(),
        catchments: vec![catchment(2.5, LandUse::SingleFamily, 200.0, 2.0)],
        slope_percent: None,
        return_period_years: 5,
        material: Material::Pvc,
        min_diameter_mm: Some(Millimetres::new(300.0)),
    }
}

/// 60 dwelling units on 2.5 ha, PVC, 200 mm minimum
pub fn sanitary_scenario() -> SanitaryPipeRequest {
    SanitaryPipeRequest {
        pipe_id: "SA-101".to_string(),
        loads: vec![homes(60, 2.5)],
        slope_percent: None,
        material: Material::Pvc,
        min_diameter_mm: Some(Millimetres::new(200.0)),
    }
}

/// 60 dwelling units split over two loads, 150 m of new ductile iron at 400 kPa
pub fn water_scenario() -> WaterServiceRequest {
    WaterServiceRequest {
        service_id: "WS-101".to_string(),
        loads: vec![homes(35, 1.5), homes(25, 1.0)],
        length_m: Metres::new(150.0),
        available_pressure_kpa: Kilopascals::new(400.0),
        elevation_change_m: Metres::new(0.0),
        material: Material::DuctileIronNew,
        fire_flow: FireFlowDemand::LandUseDefault,
        min_diameter_mm: None,
    }
}

/// Assert two floats agree within an absolute tolerance
#[track_caller]
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
