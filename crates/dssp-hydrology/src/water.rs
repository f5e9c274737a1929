//! Potable water demand estimation
//!
//! Peak-hour domestic demand follows the sanitary procedure with water
//! rates, peaked once on the tributary population. A fire flow, when
//! required, is superimposed on the domestic peak.

use crate::error::HydrologyError;
use crate::load::{tributary_demand, LoadDemand, WaterLoad};
use dssp_standards::{LitresPerSecond, StandardsTable};
use serde::{Deserialize, Serialize};

/// Fire-flow requirement on a water service
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireFlowDemand {
    /// Domestic service only
    NotRequired,
    /// Largest registry fire flow among the loads' land uses
    #[default]
    LandUseDefault,
    /// Caller-supplied fire flow
    Specified(LitresPerSecond),
}

/// Aggregate water demand
#[derive(Debug, Clone, PartialEq)]
pub struct WaterDemandEstimate {
    pub average_flow: LitresPerSecond,
    /// Peak-hour factor for the whole tributary population
    pub peaking_factor: f64,
    /// `average_flow × peaking_factor`
    pub peak_domestic_flow: LitresPerSecond,
    pub fire_flow: LitresPerSecond,
    /// Whether a non-zero fire flow is superimposed
    pub fire_flow_active: bool,
    /// `peak_domestic_flow + fire_flow`
    pub design_flow: LitresPerSecond,
    pub population: f64,
    pub loads: Vec<LoadDemand>,
    pub notes: Vec<String>,
}

/// Domestic plus fire demand estimator
#[derive(Debug, Clone, Copy)]
pub struct WaterDemandEstimator<'a> {
    table: &'a StandardsTable,
}

impl<'a> WaterDemandEstimator<'a> {
    #[inline]
    #[must_use]
    pub fn new(table: &'a StandardsTable) -> Self {
        Self { table }
    }

    /// Design flow for a group of loads
    ///
    /// # Errors
    /// - [`HydrologyError::InvalidInput`] if `loads` is empty or a specified
    ///   fire flow is not positive
    /// - [`HydrologyError::Configuration`] for unregistered land uses
    pub fn estimate(
        &self,
        loads: &[WaterLoad],
        fire: FireFlowDemand,
    ) -> Result<WaterDemandEstimate, HydrologyError> {
        let demand = tributary_demand(self.table, self.table.water_demand(), loads)?;
        let peak_domestic_flow = demand.peak_flow;

        let mut notes = Vec::new();
        let fire_flow = match fire {
            FireFlowDemand::NotRequired => {
                notes.push("fire flow not required for this service".to_string());
                LitresPerSecond::default()
            }
            FireFlowDemand::LandUseDefault => {
                let mut governing = LitresPerSecond::default();
                for load in loads {
                    governing = governing.max(self.table.fire_flow(load.land_use())?);
                }
                if governing.is_positive() {
                    notes.push(format!(
                        "fire flow {governing:.1} superimposed on peak domestic demand"
                    ));
                } else {
                    notes.push("no registry fire flow applies to these land uses".to_string());
                }
                governing
            }
            FireFlowDemand::Specified(flow) => {
                if !flow.is_positive() {
                    return Err(HydrologyError::input(
                        "fire_flow_ls",
                        format!("must be greater than zero, got {}", flow.value()),
                    ));
                }
                notes.push(format!(
                    "specified fire flow {flow:.1} superimposed on peak domestic demand"
                ));
                flow
            }
        };
        let fire_flow_active = fire_flow.is_positive();

        tracing::debug!(
            loads = demand.loads.len(),
            peaking_factor = demand.peaking_factor,
            peak_domestic_ls = peak_domestic_flow.value(),
            fire_flow_ls = fire_flow.value(),
            "Water demand estimate"
        );

        Ok(WaterDemandEstimate {
            average_flow: demand.average_flow,
            peaking_factor: demand.peaking_factor,
            peak_domestic_flow,
            fire_flow,
            fire_flow_active,
            design_flow: peak_domestic_flow + fire_flow,
            population: demand.population,
            loads: demand.loads,
            notes,
        })
    }
}
