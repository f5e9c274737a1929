//! Design orchestrator
//!
//! Composes the flow estimators with the sizing engines for the three
//! design operations. Holds nothing but a shared, immutable standards
//! table, so one instance can serve any number of threads.

use crate::error::DesignError;
use crate::request::{DesignRequest, SanitaryPipeRequest, StormPipeRequest, WaterServiceRequest};
use crate::response::{DesignResponse, PipeDesignResult, SanitaryPipeResult, WaterServiceResult};
use dssp_hydraulics::{
    GravityDesignInput, GravityMode, GravitySizingEngine, PressurizedDesignInput,
    PressurizedSizingEngine,
};
use dssp_hydrology::{RationalEstimator, SanitaryDemandEstimator, WaterDemandEstimator};
use dssp_standards::{Millimetres, ReturnPeriod, StandardsTable, ThresholdName};
use std::sync::Arc;

/// Entry point for servicing design
#[derive(Debug, Clone)]
pub struct DesignOrchestrator {
    standards: Arc<StandardsTable>,
}

impl DesignOrchestrator {
    /// Create an orchestrator over a specific table
    #[inline]
    #[must_use]
    pub fn new(standards: Arc<StandardsTable>) -> Self {
        Self { standards }
    }

    /// Create an orchestrator over the process-wide table
    #[must_use]
    pub fn global() -> Self {
        Self::new(dssp_standards::global())
    }

    #[inline]
    #[must_use]
    pub fn standards(&self) -> &StandardsTable {
        &self.standards
    }

    /// Design a storm sewer for a group of catchments
    ///
    /// # Errors
    /// Returns [`DesignError`] for invalid requests; infeasible designs are
    /// returned as results
    pub fn design_storm_pipe(
        &self,
        request: &StormPipeRequest,
    ) -> Result<PipeDesignResult, DesignError> {
        tracing::info!("Designing storm pipe {}", request.pipe_id);
        let table = self.standards();
        let period = ReturnPeriod::from_years(request.return_period_years)?;
        let catchments = request
            .catchments
            .iter()
            .enumerate()
            .map(|(i, c)| c.to_catchment(i))
            .collect::<Result<Vec<_>, _>>()?;

        let flow = RationalEstimator::new(table).estimate(&catchments, period)?;
        let sizing = GravitySizingEngine::new(table).size(&GravityDesignInput {
            design_flow: flow.design_flow,
            slope: request.slope_percent,
            material: request.material,
            min_diameter: self
                .min_diameter(request.min_diameter_mm, ThresholdName::StormMinDiameter)?,
            mode: GravityMode::Storm,
        })?;

        let mut notes = flow.notes;
        notes.extend(sizing.notes);

        Ok(PipeDesignResult {
            pipe_id: request.pipe_id.clone(),
            diameter_mm: sizing.diameter,
            slope_percent: sizing.slope,
            slope_selection: sizing.slope_selection,
            material: sizing.material,
            manning_n: sizing.manning_n,
            design_flow_ls: sizing.design_flow,
            full_flow_capacity_ls: sizing.full_flow_capacity,
            velocity_ms: sizing.velocity,
            depth_ratio: sizing.depth_ratio,
            capacity_utilization_percent: sizing.capacity_utilization_percent,
            is_capacity_adequate: sizing.is_capacity_adequate,
            is_velocity_adequate: sizing.is_velocity_adequate,
            return_period_years: period.years(),
            governing_tc_min: flow.governing_tc,
            rainfall_intensity_mm_h: flow.intensity,
            total_area_ha: catchments.iter().map(dssp_hydrology::Catchment::area).sum(),
            standards_version: table.version().to_string(),
            notes,
        })
    }

    /// Design a sanitary sewer for a group of tributary loads
    ///
    /// # Errors
    /// Returns [`DesignError`] for invalid requests
    pub fn design_sanitary_pipe(
        &self,
        request: &SanitaryPipeRequest,
    ) -> Result<SanitaryPipeResult, DesignError> {
        tracing::info!("Designing sanitary pipe {}", request.pipe_id);
        let table = self.standards();
        let loads = request
            .loads
            .iter()
            .enumerate()
            .map(|(i, l)| l.to_load(i))
            .collect::<Result<Vec<_>, _>>()?;

        let demand = SanitaryDemandEstimator::new(table).estimate(&loads)?;
        let sizing = GravitySizingEngine::new(table).size(&GravityDesignInput {
            design_flow: demand.design_flow,
            slope: request.slope_percent,
            material: request.material,
            min_diameter: self
                .min_diameter(request.min_diameter_mm, ThresholdName::SanitaryMinDiameter)?,
            mode: GravityMode::Sanitary,
        })?;
        let Some(low) = sizing.minimum_flow else {
            return Err(DesignError::request(
                "pipe_id",
                "sanitary sizing produced no minimum-flow check",
            ));
        };

        let mut notes = demand.notes;
        notes.extend(sizing.notes);

        Ok(SanitaryPipeResult {
            pipe_id: request.pipe_id.clone(),
            diameter_mm: sizing.diameter,
            slope_percent: sizing.slope,
            slope_selection: sizing.slope_selection,
            material: sizing.material,
            manning_n: sizing.manning_n,
            design_flow_ls: sizing.design_flow,
            full_flow_capacity_ls: sizing.full_flow_capacity,
            velocity_ms: sizing.velocity,
            depth_ratio: sizing.depth_ratio,
            capacity_utilization_percent: sizing.capacity_utilization_percent,
            is_capacity_adequate: sizing.is_capacity_adequate,
            is_velocity_adequate: sizing.is_velocity_adequate,
            min_flow_velocity_ms: low.velocity,
            min_flow_ls: low.flow,
            is_self_cleansing: low.is_self_cleansing,
            population: demand.population,
            average_flow_ls: demand.average_flow,
            peak_flow_ls: demand.peak_flow,
            infiltration_ls: demand.infiltration,
            standards_version: table.version().to_string(),
            notes,
        })
    }

    /// Design a water service for a group of loads
    ///
    /// # Errors
    /// Returns [`DesignError`] for invalid requests
    pub fn design_water_service(
        &self,
        request: &WaterServiceRequest,
    ) -> Result<WaterServiceResult, DesignError> {
        tracing::info!("Designing water service {}", request.service_id);
        let table = self.standards();
        let loads = request
            .loads
            .iter()
            .enumerate()
            .map(|(i, l)| l.to_load(i))
            .collect::<Result<Vec<_>, _>>()?;

        let demand = WaterDemandEstimator::new(table).estimate(&loads, request.fire_flow)?;
        let sizing = PressurizedSizingEngine::new(table).size(&PressurizedDesignInput {
            domestic_flow: demand.peak_domestic_flow,
            fire_flow: demand.fire_flow,
            length: request.length_m,
            available_pressure: request.available_pressure_kpa,
            elevation_change: request.elevation_change_m,
            material: request.material,
            min_diameter: Some(
                self.min_diameter(request.min_diameter_mm, ThresholdName::WaterMinDiameter)?,
            ),
        })?;

        let mut notes = demand.notes;
        notes.extend(sizing.notes);

        Ok(WaterServiceResult {
            service_id: request.service_id.clone(),
            diameter_mm: sizing.diameter,
            material: sizing.material,
            hazen_williams_c: sizing.hazen_williams_c,
            design_flow_ls: sizing.design_flow,
            peak_domestic_flow_ls: demand.peak_domestic_flow,
            fire_flow_ls: demand.fire_flow,
            velocity_ms: sizing.velocity,
            head_loss_m: sizing.head_loss,
            available_pressure_kpa: sizing.available_pressure,
            residual_pressure_kpa: sizing.residual_pressure,
            min_pressure_kpa: sizing.min_pressure,
            fire_head_loss_m: sizing.fire.map(|f| f.head_loss),
            fire_residual_pressure_kpa: sizing.fire.map(|f| f.residual_pressure),
            fire_min_pressure_kpa: sizing.fire_min_pressure,
            is_pressure_adequate: sizing.is_pressure_adequate,
            is_velocity_adequate: sizing.is_velocity_adequate,
            is_fire_flow_adequate: sizing.is_fire_flow_adequate,
            standards_version: table.version().to_string(),
            notes,
        })
    }

    /// Dispatch a tagged request
    ///
    /// # Errors
    /// Same as the operation the request selects
    pub fn design(&self, request: &DesignRequest) -> Result<DesignResponse, DesignError> {
        Ok(match request {
            DesignRequest::Storm(r) => DesignResponse::Storm(self.design_storm_pipe(r)?),
            DesignRequest::Sanitary(r) => DesignResponse::Sanitary(self.design_sanitary_pipe(r)?),
            DesignRequest::Water(r) => DesignResponse::Water(self.design_water_service(r)?),
        })
    }

    fn min_diameter(
        &self,
        requested: Option<Millimetres>,
        fallback: ThresholdName,
    ) -> Result<Millimetres, DesignError> {
        match requested {
            Some(d) if !d.is_positive() => Err(DesignError::request(
                "min_diameter_mm",
                format!("must be greater than zero, got {}", d.value()),
            )),
            Some(d) => Ok(d),
            None => Ok(Millimetres::new(self.standards.threshold(fallback))),
        }
    }
}

impl Default for DesignOrchestrator {
    fn default() -> Self {
        Self::global()
    }
}
