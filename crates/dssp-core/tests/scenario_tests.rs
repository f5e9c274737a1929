use dssp_core::prelude::*;
use dssp_test_utils::{
    assert_close, catchment, homes, sanitary_scenario, setup_test_orchestrator, storm_scenario,
    water_scenario,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_storm_scenario() {
    let orchestrator = setup_test_orchestrator();
    let result = orchestrator.design_storm_pipe(&storm_scenario()).unwrap();

    assert!(result.design_flow_ls.value() >= 0.0);
    assert!(result.diameter_mm >= Millimetres::new(300.0));
    assert!(orchestrator
        .standards()
        .diameter_ladder()
        .contains(&result.diameter_mm));
    if result.is_capacity_adequate {
        assert!(result.capacity_utilization_percent <= 80.0);
    }
    assert_eq!(result.return_period_years, 5);
    // Kirpich gives about 5 min on this lot, below the 10 min floor
    assert_eq!(result.governing_tc_min, Minutes::new(10.0));
    assert!((result.manning_n - 0.011).abs() < 1e-12);
    assert_eq!(result.standards_version, "dssp-2024.1");
}

#[test]
fn test_storm_flow_matches_rational_method() {
    let orchestrator = setup_test_orchestrator();
    let result = orchestrator.design_storm_pipe(&storm_scenario()).unwrap();

    let i = 990.0 / (10.0_f64 + 6.5).powf(0.79);
    assert_close(result.rainfall_intensity_mm_h.value(), i, 1e-9);
    assert_close(result.design_flow_ls.value(), 0.35 * i * 2.5 / 0.36, 1e-9);
}

#[test]
fn test_sanitary_scenario() {
    let orchestrator = setup_test_orchestrator();
    let result = orchestrator.design_sanitary_pipe(&sanitary_scenario()).unwrap();

    assert!(result.diameter_mm >= Millimetres::new(200.0));
    assert!(result.min_flow_velocity_ms < result.velocity_ms);
    assert_close(result.min_flow_ls.value(), 0.30 * result.design_flow_ls.value(), 1e-12);
    assert_close(result.population, 180.0, 1e-9);
    assert_close(result.infiltration_ls.value(), 0.25, 1e-12);
}

#[test]
fn test_self_cleansing_can_fail_on_an_adequate_pipe() {
    let orchestrator = setup_test_orchestrator();
    let result = orchestrator.design_sanitary_pipe(&sanitary_scenario()).unwrap();

    assert!(result.is_capacity_adequate);
    assert!(result.is_velocity_adequate);
    assert!(!result.is_self_cleansing);
    assert!(result.notes.iter().any(|n| n.contains("self-cleansing")));
}

#[test]
fn test_water_scenario() {
    let orchestrator = setup_test_orchestrator();
    let result = orchestrator.design_water_service(&water_scenario()).unwrap();

    let expected = result.available_pressure_kpa.value() - result.head_loss_m.value() * 9.81;
    assert_close(result.residual_pressure_kpa.value(), expected, 1e-9);
    assert_eq!(result.min_pressure_kpa, Kilopascals::new(275.0));
    assert_eq!(
        result.is_pressure_adequate,
        result.residual_pressure_kpa >= result.min_pressure_kpa
    );
    // single-family fire flow is superimposed on the peak domestic flow
    assert_eq!(result.fire_flow_ls, LitresPerSecond::new(60.0));
    assert_eq!(result.design_flow_ls, result.peak_domestic_flow_ls + result.fire_flow_ls);
    assert_eq!(result.fire_min_pressure_kpa, Kilopascals::new(140.0));
    let fire_residual = result.fire_residual_pressure_kpa.unwrap();
    let fire_loss = result.fire_head_loss_m.unwrap();
    assert_close(
        fire_residual.value(),
        result.available_pressure_kpa.value() - fire_loss.value() * 9.81,
        1e-9,
    );
    assert!(fire_residual < result.residual_pressure_kpa);
    assert!(result.velocity_ms.value() <= 3.0);
    assert!(result.is_pressure_adequate);
    assert!(result.is_fire_flow_adequate);
    assert_eq!(result.diameter_mm, Millimetres::new(200.0));
}

#[test]
fn test_low_supply_pressure_fails_normal_service_under_fire_flow() {
    let orchestrator = setup_test_orchestrator();
    let request = WaterServiceRequest {
        available_pressure_kpa: Kilopascals::new(200.0),
        ..water_scenario()
    };
    let result = orchestrator.design_water_service(&request).unwrap();

    // above the 140 kPa fire minimum but below the 275 kPa service minimum
    assert!(!result.is_pressure_adequate);
    assert!(result.is_fire_flow_adequate);
    assert!(result.residual_pressure_kpa < result.min_pressure_kpa);
    assert_eq!(result.diameter_mm, orchestrator.standards().max_diameter());
    assert!(result
        .notes
        .iter()
        .any(|n| n.contains("below the 275 kPa minimum")));
}

#[test]
fn test_water_without_fire_flow_uses_normal_minimum() {
    let orchestrator = setup_test_orchestrator();
    let request = WaterServiceRequest {
        fire_flow: FireFlowDemand::NotRequired,
        ..water_scenario()
    };
    let result = orchestrator.design_water_service(&request).unwrap();

    assert_eq!(result.min_pressure_kpa, Kilopascals::new(275.0));
    assert_eq!(result.fire_flow_ls, LitresPerSecond::new(0.0));
    assert_eq!(result.fire_residual_pressure_kpa, None);
    assert!(result.is_fire_flow_adequate);
    assert_eq!(result.diameter_mm, Millimetres::new(150.0));
}

#[test]
fn test_infeasible_storm_is_a_result() {
    let orchestrator = setup_test_orchestrator();
    let request = StormPipeRequest {
        catchments: vec![catchment(400.0, LandUse::Commercial, 150.0, 3.0)],
        slope_percent: Some(SlopePercent::new(0.1)),
        ..storm_scenario()
    };
    let result = orchestrator.design_storm_pipe(&request).unwrap();

    assert_eq!(result.diameter_mm, orchestrator.standards().max_diameter());
    assert!(!result.is_capacity_adequate);
    assert!(!result.is_velocity_adequate);
    assert!(result
        .notes
        .iter()
        .any(|n| n.contains("at maximum standard diameter")));
}

#[test]
fn test_repeated_calls_are_identical() {
    let orchestrator = setup_test_orchestrator();

    let storm = storm_scenario();
    assert_eq!(
        orchestrator.design_storm_pipe(&storm).unwrap(),
        orchestrator.design_storm_pipe(&storm).unwrap()
    );

    let sanitary = sanitary_scenario();
    assert_eq!(
        orchestrator.design_sanitary_pipe(&sanitary).unwrap(),
        orchestrator.design_sanitary_pipe(&sanitary).unwrap()
    );

    let water = water_scenario();
    let first = orchestrator.design_water_service(&water).unwrap();
    let second = orchestrator.clone().design_water_service(&water).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_tagged_dispatch() {
    let orchestrator = setup_test_orchestrator();
    let response = orchestrator
        .design(&DesignRequest::Sanitary(sanitary_scenario()))
        .unwrap();
    let DesignResponse::Sanitary(result) = &response else {
        panic!("expected sanitary response");
    };
    assert_eq!(result.pipe_id, "SA-101");
    assert!(!response.is_adequate());
}

#[test]
fn test_responses_survive_json() {
    let orchestrator = setup_test_orchestrator();
    let result = orchestrator.design_storm_pipe(&storm_scenario()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["material"], "pvc");
    assert_eq!(json["slope_selection"], "auto");
    let back: PipeDesignResult = serde_json::from_value(json).unwrap();
    assert_eq!(back.diameter_mm, result.diameter_mm);
    assert_eq!(back.notes, result.notes);
}

#[test]
fn test_designs_run_in_parallel() {
    let orchestrator = setup_test_orchestrator();
    let expected = orchestrator.design_storm_pipe(&storm_scenario()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let orchestrator = orchestrator.clone();
            std::thread::spawn(move || orchestrator.design_storm_pipe(&storm_scenario()).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

proptest! {
    #[test]
    fn prop_storm_flow_increases_with_area(area in 0.1f64..40.0, extra in 0.05f64..10.0) {
        let orchestrator = setup_test_orchestrator();
        let small = StormPipeRequest {
            catchments: vec![catchment(area, LandUse::SingleFamily, 200.0, 2.0)],
            ..storm_scenario()
        };
        let large = StormPipeRequest {
            catchments: vec![catchment(area + extra, LandUse::SingleFamily, 200.0, 2.0)],
            ..storm_scenario()
        };
        let small = orchestrator.design_storm_pipe(&small).unwrap();
        let large = orchestrator.design_storm_pipe(&large).unwrap();
        prop_assert!(large.design_flow_ls > small.design_flow_ls);
        prop_assert!(large.diameter_mm >= small.diameter_mm);
    }

    #[test]
    fn prop_sanitary_diameter_never_below_minimum(
        units in 1u32..20_000,
        min in prop_oneof![Just(200.0), Just(250.0), Just(450.0)],
    ) {
        let orchestrator = setup_test_orchestrator();
        let request = SanitaryPipeRequest {
            loads: vec![homes(units, 5.0)],
            min_diameter_mm: Some(Millimetres::new(min)),
            ..sanitary_scenario()
        };
        let result = orchestrator.design_sanitary_pipe(&request).unwrap();
        prop_assert!(result.diameter_mm >= Millimetres::new(min));
        if !result.is_capacity_adequate {
            prop_assert_eq!(result.diameter_mm, orchestrator.standards().max_diameter());
            prop_assert!(!result.is_velocity_adequate);
        }
    }

    #[test]
    fn prop_storm_minimum_anywhere_on_the_ladder(
        area in 0.05f64..30.0,
        min_index in 0usize..17,
    ) {
        let orchestrator = setup_test_orchestrator();
        let ladder = orchestrator.standards().diameter_ladder().to_vec();
        let min = ladder[min_index];
        let request = StormPipeRequest {
            catchments: vec![catchment(area, LandUse::SingleFamily, 200.0, 2.0)],
            min_diameter_mm: Some(min),
            ..storm_scenario()
        };
        let result = orchestrator.design_storm_pipe(&request).unwrap();
        prop_assert!(result.diameter_mm >= min);

        // starting the search one size below the chosen diameter, but not
        // below the caller minimum, lands on the same diameter
        let chosen = ladder.iter().position(|d| *d == result.diameter_mm).unwrap();
        if result.is_capacity_adequate && result.is_velocity_adequate && chosen > min_index {
            let retry = StormPipeRequest {
                min_diameter_mm: Some(ladder[chosen - 1]),
                ..request
            };
            let again = orchestrator.design_storm_pipe(&retry).unwrap();
            prop_assert_eq!(again.diameter_mm, result.diameter_mm);
        }
    }
}
