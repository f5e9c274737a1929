//! Rational Method peak-flow estimation
//!
//! `Q = K · C · i · A` with `K = 1 / 0.36`, so hectares and mm/h yield L/s.
//! All catchments draining to one pipe share a single storm duration equal
//! to the longest time of concentration among them.

use crate::catchment::{Catchment, RunoffSource, TcSource};
use crate::error::HydrologyError;
use crate::idf::IdfCurve;
use dssp_standards::{
    Hectares, LitresPerSecond, MillimetresPerHour, Minutes, ReturnPeriod, StandardsTable,
    ThresholdName,
};

/// Converts `ha · mm/h` to `L/s`
pub const RATIONAL_CONVERSION: f64 = 1.0 / 0.36;

/// Peak flow from one catchment at the governing duration
#[derive(Debug, Clone, PartialEq)]
pub struct CatchmentContribution {
    pub id: String,
    pub area: Hectares,
    pub runoff_coefficient: f64,
    pub time_of_concentration: Minutes,
    pub peak_flow: LitresPerSecond,
}

/// Aggregate Rational Method result
#[derive(Debug, Clone, PartialEq)]
pub struct RationalEstimate {
    /// Sum of catchment peak flows
    pub design_flow: LitresPerSecond,
    /// Longest time of concentration in the group
    pub governing_tc: Minutes,
    /// Intensity at the governing duration
    pub intensity: MillimetresPerHour,
    pub return_period: ReturnPeriod,
    pub contributions: Vec<CatchmentContribution>,
    /// Advisory notes
    pub notes: Vec<String>,
}

/// Catchment flow estimator
#[derive(Debug, Clone, Copy)]
pub struct RationalEstimator<'a> {
    table: &'a StandardsTable,
}

impl<'a> RationalEstimator<'a> {
    /// Create an estimator reading from `table`
    #[inline]
    #[must_use]
    pub fn new(table: &'a StandardsTable) -> Self {
        Self { table }
    }

    /// Peak design flow for a group of catchments
    ///
    /// # Errors
    /// - [`HydrologyError::InvalidInput`] if `catchments` is empty
    /// - [`HydrologyError::UnsupportedReturnPeriod`] if the table has no IDF
    ///   coefficients for `period`
    /// - [`HydrologyError::Configuration`] if a land use is not registered
    pub fn estimate(
        &self,
        catchments: &[Catchment],
        period: ReturnPeriod,
    ) -> Result<RationalEstimate, HydrologyError> {
        if catchments.is_empty() {
            return Err(HydrologyError::input(
                "catchments",
                "at least one catchment is required",
            ));
        }

        let curve = IdfCurve::for_period(self.table, period)?;
        let mut notes = Vec::new();

        let resolved = catchments
            .iter()
            .map(|c| {
                let runoff = self.resolve_runoff(c, &mut notes)?;
                let tc = self.resolve_tc(c, runoff, &mut notes);
                Ok((c, runoff, tc))
            })
            .collect::<Result<Vec<_>, HydrologyError>>()?;

        let governing_tc = resolved
            .iter()
            .map(|(_, _, tc)| *tc)
            .fold(Minutes::default(), Minutes::max);
        let intensity = curve.intensity(governing_tc);

        let contributions: Vec<_> = resolved
            .into_iter()
            .map(|(c, runoff, tc)| CatchmentContribution {
                id: c.id().to_string(),
                area: c.area(),
                runoff_coefficient: runoff,
                time_of_concentration: tc,
                peak_flow: peak_flow(runoff, intensity, c.area()),
            })
            .collect();

        let design_flow: LitresPerSecond = contributions.iter().map(|c| c.peak_flow).sum();

        if contributions.len() > 1 {
            notes.push(format!(
                "{} catchments combined at the longest time of concentration ({:.1} min)",
                contributions.len(),
                governing_tc.value()
            ));
        }

        tracing::debug!(
            catchments = contributions.len(),
            tc_min = governing_tc.value(),
            intensity_mm_h = intensity.value(),
            flow_ls = design_flow.value(),
            "Rational Method estimate"
        );

        Ok(RationalEstimate {
            design_flow,
            governing_tc,
            intensity,
            return_period: period,
            contributions,
            notes,
        })
    }

    fn resolve_runoff(
        &self,
        catchment: &Catchment,
        notes: &mut Vec<String>,
    ) -> Result<f64, HydrologyError> {
        let range = self.table.runoff_coefficient(catchment.land_use())?;
        Ok(match catchment.runoff() {
            RunoffSource::LandUseDefault => range.value,
            RunoffSource::Explicit(c) => {
                if !range.contains(c) {
                    notes.push(format!(
                        "catchment '{}': runoff coefficient {c:.2} is outside the typical \
                         {:.2}-{:.2} range for {}",
                        catchment.id(),
                        range.min,
                        range.max,
                        catchment.land_use()
                    ));
                }
                c
            }
        })
    }

    fn resolve_tc(&self, catchment: &Catchment, runoff: f64, notes: &mut Vec<String>) -> Minutes {
        let floor = Minutes::new(self.table.threshold(ThresholdName::MinTimeOfConcentration));
        match catchment.tc_source() {
            TcSource::Explicit(tc) => {
                if tc < floor {
                    notes.push(format!(
                        "catchment '{}': explicit time of concentration {:.1} min is below \
                         the {:.0} min standard minimum",
                        catchment.id(),
                        tc.value(),
                        floor.value()
                    ));
                }
                tc
            }
            TcSource::Computed {
                method,
                flow_path_length,
                average_slope,
            } => {
                let tc = method.compute(flow_path_length, average_slope, runoff, catchment.area());
                if tc < floor {
                    notes.push(format!(
                        "catchment '{}': computed time of concentration {:.1} min raised \
                         to the {:.0} min minimum",
                        catchment.id(),
                        tc.value(),
                        floor.value()
                    ));
                    floor
                } else {
                    tc
                }
            }
        }
    }
}

/// Rational Method peak flow for one area
#[inline]
#[must_use]
pub fn peak_flow(runoff_c: f64, intensity: MillimetresPerHour, area: Hectares) -> LitresPerSecond {
    LitresPerSecond::new(RATIONAL_CONVERSION * runoff_c * intensity.value() * area.value())
}
