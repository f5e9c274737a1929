//! Sanitary demand estimation
//!
//! Average flows of all loads are summed and peaked once on the combined
//! population equivalent. The area-proportional infiltration allowance is
//! added unpeaked.

use crate::error::HydrologyError;
use crate::load::{tributary_demand, LoadDemand, SanitaryLoad};
use dssp_standards::{Hectares, LitresPerSecond, StandardsTable};

/// Aggregate sanitary flow for a group of loads
#[derive(Debug, Clone, PartialEq)]
pub struct SanitaryEstimate {
    /// Sum of average daily flows
    pub average_flow: LitresPerSecond,
    /// Harmon factor for the whole tributary population
    pub peaking_factor: f64,
    /// `average_flow × peaking_factor`
    pub peak_flow: LitresPerSecond,
    /// Groundwater infiltration allowance
    pub infiltration: LitresPerSecond,
    /// `peak_flow + infiltration`
    pub design_flow: LitresPerSecond,
    pub total_area: Hectares,
    /// Total resident population
    pub population: f64,
    /// Residents plus employees as a population equivalent
    pub equivalent_population: f64,
    pub loads: Vec<LoadDemand>,
    pub notes: Vec<String>,
}

/// Peak sanitary flow estimator
///
/// The peaking factor is a function of the tributary population, so loads
/// are not peaked one by one and then summed.
#[derive(Debug, Clone, Copy)]
pub struct SanitaryDemandEstimator<'a> {
    table: &'a StandardsTable,
}

impl<'a> SanitaryDemandEstimator<'a> {
    #[inline]
    #[must_use]
    pub fn new(table: &'a StandardsTable) -> Self {
        Self { table }
    }

    /// Peak design flow including infiltration
    ///
    /// # Errors
    /// - [`HydrologyError::InvalidInput`] if `loads` is empty
    /// - [`HydrologyError::Configuration`] if a land use lacks an occupancy
    pub fn estimate(&self, loads: &[SanitaryLoad]) -> Result<SanitaryEstimate, HydrologyError> {
        let rates = self.table.sanitary_demand();
        let demand = tributary_demand(self.table, rates, loads)?;
        let peak_flow = demand.peak_flow;
        let total_area: Hectares = loads.iter().map(SanitaryLoad::area).sum();
        let rate = self.table.thresholds().infiltration_ls_per_ha;
        let infiltration = LitresPerSecond::new(rate * total_area.value());
        let design_flow = peak_flow + infiltration;

        let mut notes = vec![format!(
            "infiltration allowance {infiltration:.2} ({rate} L/s/ha over {total_area:.2})"
        )];
        let cap = rates.peaking.cap;
        if demand.peaking_factor >= cap {
            notes.push(format!(
                "peaking factor held at the {cap:.1} cap for a tributary population of {:.0}",
                demand.equivalent_population
            ));
        }

        tracing::debug!(
            loads = demand.loads.len(),
            peaking_factor = demand.peaking_factor,
            average_ls = demand.average_flow.value(),
            peak_ls = peak_flow.value(),
            infiltration_ls = infiltration.value(),
            "Sanitary demand estimate"
        );

        Ok(SanitaryEstimate {
            average_flow: demand.average_flow,
            peaking_factor: demand.peaking_factor,
            peak_flow,
            infiltration,
            design_flow,
            total_area,
            population: demand.population,
            equivalent_population: demand.equivalent_population,
            loads: demand.loads,
            notes,
        })
    }
}
