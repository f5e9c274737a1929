//! Design response contracts
//!
//! Each response is built once per call. Adequacy flags report one
//! criterion each and `notes` explains every flag that is false.

use dssp_hydraulics::SlopeSelection;
use dssp_standards::{
    Hectares, Kilopascals, LitresPerSecond, Material, Metres, MetresPerSecond, MillimetresPerHour,
    Millimetres, Minutes, SlopePercent,
};
use serde::{Deserialize, Serialize};

/// Storm pipe design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeDesignResult {
    pub pipe_id: String,
    pub diameter_mm: Millimetres,
    pub slope_percent: SlopePercent,
    pub slope_selection: SlopeSelection,
    pub material: Material,
    pub manning_n: f64,
    pub design_flow_ls: LitresPerSecond,
    pub full_flow_capacity_ls: LitresPerSecond,
    pub velocity_ms: MetresPerSecond,
    /// Flow depth over diameter, 1 when surcharged
    pub depth_ratio: f64,
    pub capacity_utilization_percent: f64,
    pub is_capacity_adequate: bool,
    pub is_velocity_adequate: bool,
    pub return_period_years: u32,
    /// Storm duration used for intensity
    pub governing_tc_min: Minutes,
    pub rainfall_intensity_mm_h: MillimetresPerHour,
    pub total_area_ha: Hectares,
    pub standards_version: String,
    pub notes: Vec<String>,
}

/// Sanitary pipe design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitaryPipeResult {
    pub pipe_id: String,
    pub diameter_mm: Millimetres,
    pub slope_percent: SlopePercent,
    pub slope_selection: SlopeSelection,
    pub material: Material,
    pub manning_n: f64,
    pub design_flow_ls: LitresPerSecond,
    pub full_flow_capacity_ls: LitresPerSecond,
    pub velocity_ms: MetresPerSecond,
    pub depth_ratio: f64,
    pub capacity_utilization_percent: f64,
    pub is_capacity_adequate: bool,
    pub is_velocity_adequate: bool,
    /// Velocity at the minimum-flow fraction of design flow
    pub min_flow_velocity_ms: MetresPerSecond,
    pub min_flow_ls: LitresPerSecond,
    pub is_self_cleansing: bool,
    pub population: f64,
    pub average_flow_ls: LitresPerSecond,
    pub peak_flow_ls: LitresPerSecond,
    pub infiltration_ls: LitresPerSecond,
    pub standards_version: String,
    pub notes: Vec<String>,
}

/// Water service design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterServiceResult {
    pub service_id: String,
    pub diameter_mm: Millimetres,
    pub material: Material,
    pub hazen_williams_c: f64,
    /// Peak domestic demand plus fire flow
    pub design_flow_ls: LitresPerSecond,
    pub peak_domestic_flow_ls: LitresPerSecond,
    pub fire_flow_ls: LitresPerSecond,
    /// Velocity at the design flow
    pub velocity_ms: MetresPerSecond,
    /// Friction loss at the peak domestic flow
    pub head_loss_m: Metres,
    pub available_pressure_kpa: Kilopascals,
    /// Normal-service residual at the peak domestic flow
    pub residual_pressure_kpa: Kilopascals,
    pub min_pressure_kpa: Kilopascals,
    /// Friction loss at the design flow; absent without fire flow
    pub fire_head_loss_m: Option<Metres>,
    /// Residual while the fire flow is drawn; absent without fire flow
    pub fire_residual_pressure_kpa: Option<Kilopascals>,
    pub fire_min_pressure_kpa: Kilopascals,
    pub is_pressure_adequate: bool,
    pub is_velocity_adequate: bool,
    pub is_fire_flow_adequate: bool,
    pub standards_version: String,
    pub notes: Vec<String>,
}

/// Any of the three results, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DesignResponse {
    Storm(PipeDesignResult),
    Sanitary(SanitaryPipeResult),
    Water(WaterServiceResult),
}

impl DesignResponse {
    /// Whether every adequacy flag of the design holds
    #[must_use]
    pub fn is_adequate(&self) -> bool {
        match self {
            Self::Storm(r) => r.is_capacity_adequate && r.is_velocity_adequate,
            Self::Sanitary(r) => {
                r.is_capacity_adequate && r.is_velocity_adequate && r.is_self_cleansing
            }
            Self::Water(r) => {
                r.is_pressure_adequate && r.is_velocity_adequate && r.is_fire_flow_adequate
            }
        }
    }

    #[must_use]
    pub fn notes(&self) -> &[String] {
        match self {
            Self::Storm(r) => &r.notes,
            Self::Sanitary(r) => &r.notes,
            Self::Water(r) => &r.notes,
        }
    }
}
