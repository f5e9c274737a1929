//! Design request contracts
//!
//! Wire shapes use snake_case field names carrying their unit suffix.
//! Unrecognised fields are rejected rather than ignored.
//! Conversion into validated domain values happens in the orchestrator.

use crate::error::DesignError;
use dssp_hydrology::{Catchment, FireFlowDemand, TcMethod, TcSource, TributaryLoad};
use dssp_standards::{
    Hectares, Kilopascals, LandUse, Material, Metres, Millimetres, Minutes, SlopePercent,
};
use serde::{Deserialize, Serialize};

/// One catchment draining to a storm pipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatchmentInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub area_ha: Hectares,
    pub land_use: LandUse,
    /// Overrides the land-use default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runoff_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_path_length_m: Option<Metres>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_slope_percent: Option<SlopePercent>,
    #[serde(default)]
    pub tc_method: TcMethod,
    /// Explicit time of concentration; takes precedence over the method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tc_minutes: Option<Minutes>,
}

impl CatchmentInput {
    pub(crate) fn to_catchment(&self, index: usize) -> Result<Catchment, DesignError> {
        let id = self.id.clone().unwrap_or_else(|| format!("catchment-{}", index + 1));
        let tc = match self.tc_minutes {
            Some(minutes) => TcSource::Explicit(minutes),
            None => TcSource::Computed {
                method: self.tc_method,
                flow_path_length: self.flow_path_length_m.ok_or_else(|| {
                    DesignError::request(
                        "flow_path_length_m",
                        format!("catchment '{id}' needs a flow path length or tc_minutes"),
                    )
                })?,
                average_slope: self.average_slope_percent.ok_or_else(|| {
                    DesignError::request(
                        "average_slope_percent",
                        format!("catchment '{id}' needs an average slope or tc_minutes"),
                    )
                })?,
            },
        };

        let catchment = Catchment::new(id, self.area_ha, self.land_use, tc)?;
        Ok(match self.runoff_c {
            Some(c) => catchment.with_runoff_coefficient(c)?,
            None => catchment,
        })
    }
}

/// One tributary load on a sanitary pipe or water service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub land_use: LandUse,
    pub area_ha: Hectares,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dwelling_units: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<u32>,
}

impl LoadInput {
    pub(crate) fn to_load(&self, index: usize) -> Result<TributaryLoad, DesignError> {
        let id = self.id.clone().unwrap_or_else(|| format!("load-{}", index + 1));
        Ok(TributaryLoad::new(
            id,
            self.land_use,
            self.area_ha,
            self.dwelling_units,
            self.population,
            self.employees,
        )?)
    }
}

/// Storm pipe design request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StormPipeRequest {
    pub pipe_id: String,
    pub catchments: Vec<CatchmentInput>,
    /// Fixed grade; auto-selected per diameter when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slope_percent: Option<SlopePercent>,
    pub return_period_years: u32,
    pub material: Material,
    /// Registry storm minimum when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_diameter_mm: Option<Millimetres>,
}

/// Sanitary pipe design request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SanitaryPipeRequest {
    pub pipe_id: String,
    pub loads: Vec<LoadInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slope_percent: Option<SlopePercent>,
    pub material: Material,
    /// Registry sanitary minimum when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_diameter_mm: Option<Millimetres>,
}

/// Water service design request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaterServiceRequest {
    pub service_id: String,
    pub loads: Vec<LoadInput>,
    pub length_m: Metres,
    pub available_pressure_kpa: Kilopascals,
    /// Positive when the service point is above the main
    #[serde(default)]
    pub elevation_change_m: Metres,
    pub material: Material,
    #[serde(default)]
    pub fire_flow: FireFlowDemand,
    /// Registry water minimum when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_diameter_mm: Option<Millimetres>,
}

/// Any of the three requests, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DesignRequest {
    Storm(StormPipeRequest),
    Sanitary(SanitaryPipeRequest),
    Water(WaterServiceRequest),
}
