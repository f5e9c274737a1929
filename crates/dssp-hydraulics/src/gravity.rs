//! Gravity pipe sizing shared by storm and sanitary design
//!
//! The engine walks the standard diameter ladder in ascending order and
//! returns the first diameter whose capacity utilization and part-full
//! velocity both satisfy the mode's thresholds. When none does, the
//! largest standard diameter is reported with both adequacy flags false.

use crate::error::HydraulicsError;
use crate::geometry::{CircularSection, FlowState};
use dssp_standards::{
    LitresPerSecond, Material, MetresPerSecond, Millimetres, SlopePercent, StandardsTable,
    ThresholdName,
};
use serde::{Deserialize, Serialize};

const SLOPE_BISECTION_STEPS: usize = 60;

/// Smallest slope considered by the auto-slope search (percent)
const SLOPE_SEARCH_FLOOR: f64 = 1e-5;

/// Gravity service being designed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GravityMode {
    Storm,
    Sanitary,
}

impl GravityMode {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Storm => "storm",
            Self::Sanitary => "sanitary",
        }
    }

    fn min_velocity(self) -> ThresholdName {
        match self {
            Self::Storm => ThresholdName::StormMinVelocity,
            Self::Sanitary => ThresholdName::SanitaryMinVelocity,
        }
    }

    fn max_velocity(self) -> ThresholdName {
        match self {
            Self::Storm => ThresholdName::StormMaxVelocity,
            Self::Sanitary => ThresholdName::SanitaryMaxVelocity,
        }
    }

    fn capacity_ceiling(self) -> ThresholdName {
        match self {
            Self::Storm => ThresholdName::StormCapacityCeiling,
            Self::Sanitary => ThresholdName::SanitaryCapacityCeiling,
        }
    }
}

/// How the reported slope was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlopeSelection {
    /// Supplied by the caller
    Fixed,
    /// Smallest permitted slope meeting the minimum velocity
    Auto,
}

/// Gravity sizing request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityDesignInput {
    pub design_flow: LitresPerSecond,
    /// Fixed grade; `None` lets the engine choose per diameter
    pub slope: Option<SlopePercent>,
    pub material: Material,
    pub min_diameter: Millimetres,
    pub mode: GravityMode,
}

/// One diameter evaluated against the mode thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub diameter: Millimetres,
    pub slope: SlopePercent,
    pub state: FlowState,
    /// `Q / Q_full × 100`
    pub capacity_utilization_percent: f64,
    pub is_capacity_adequate: bool,
    pub is_velocity_adequate: bool,
}

impl Candidate {
    #[inline]
    #[must_use]
    pub fn is_adequate(&self) -> bool {
        self.is_capacity_adequate && self.is_velocity_adequate
    }
}

/// Low-flow check on a sanitary pipe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimumFlowCheck {
    /// `fraction × design flow`
    pub flow: LitresPerSecond,
    pub velocity: MetresPerSecond,
    pub depth_ratio: f64,
    pub is_self_cleansing: bool,
}

/// Gravity sizing outcome
#[derive(Debug, Clone, PartialEq)]
pub struct GravitySizing {
    pub mode: GravityMode,
    pub diameter: Millimetres,
    pub slope: SlopePercent,
    pub slope_selection: SlopeSelection,
    pub material: Material,
    pub manning_n: f64,
    pub design_flow: LitresPerSecond,
    pub full_flow_capacity: LitresPerSecond,
    pub velocity: MetresPerSecond,
    pub depth_ratio: f64,
    pub capacity_utilization_percent: f64,
    pub is_capacity_adequate: bool,
    pub is_velocity_adequate: bool,
    /// Present in sanitary mode only
    pub minimum_flow: Option<MinimumFlowCheck>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    min_velocity: MetresPerSecond,
    max_velocity: MetresPerSecond,
    capacity_ceiling: f64,
    slope_increment: SlopePercent,
    max_auto_slope: SlopePercent,
}

/// Manning-based gravity pipe sizing engine
#[derive(Debug, Clone, Copy)]
pub struct GravitySizingEngine<'a> {
    table: &'a StandardsTable,
}

impl<'a> GravitySizingEngine<'a> {
    #[inline]
    #[must_use]
    pub fn new(table: &'a StandardsTable) -> Self {
        Self { table }
    }

    /// Size a gravity pipe
    ///
    /// # Errors
    /// - [`HydraulicsError::InvalidInput`] for a non-positive design flow,
    ///   a non-positive fixed slope, or a minimum diameter above the ladder
    /// - [`HydraulicsError::Configuration`] if the material has no Manning's n
    pub fn size(&self, input: &GravityDesignInput) -> Result<GravitySizing, HydraulicsError> {
        HydraulicsError::require_positive("design_flow_ls", input.design_flow.value())?;
        if let Some(slope) = input.slope {
            HydraulicsError::require_positive("slope_percent", slope.value())?;
        }
        let manning_n = self.table.manning_n(input.material)?;
        let mut notes = Vec::new();
        let candidates = self.candidate_diameters(input)?;
        let limits = self.limits(input.mode);

        let mut chosen = None;
        let mut last = None;
        for &diameter in candidates {
            let candidate = self.evaluate(input, manning_n, diameter, &limits);
            tracing::debug!(
                mode = input.mode.name(),
                diameter_mm = diameter.value(),
                slope_percent = candidate.slope.value(),
                utilization = candidate.capacity_utilization_percent,
                velocity_ms = candidate.state.velocity.value(),
                adequate = candidate.is_adequate(),
                "Evaluated candidate diameter"
            );
            if candidate.is_adequate() {
                chosen = Some(candidate);
                break;
            }
            last = Some(candidate);
        }

        let feasible = chosen.is_some();
        let Some(candidate) = chosen.or(last) else {
            return Err(HydraulicsError::input(
                "min_diameter_mm",
                "no standard diameter at or above the minimum",
            ));
        };

        if feasible {
            tracing::info!(
                mode = input.mode.name(),
                diameter_mm = candidate.diameter.value(),
                slope_percent = candidate.slope.value(),
                "Gravity pipe sized"
            );
        } else {
            infeasibility_notes(&candidate, &limits, &mut notes);
            tracing::warn!(
                mode = input.mode.name(),
                diameter_mm = candidate.diameter.value(),
                "No standard diameter satisfies capacity and velocity"
            );
        }

        if input.slope.is_none() && candidate.slope >= limits.max_auto_slope {
            notes.push(format!(
                "auto-selected slope capped at the {:.2} maximum",
                limits.max_auto_slope
            ));
        }

        let minimum_flow = match input.mode {
            GravityMode::Storm => None,
            GravityMode::Sanitary => {
                Some(self.minimum_flow_check(input, manning_n, &candidate, &mut notes))
            }
        };

        Ok(GravitySizing {
            mode: input.mode,
            diameter: candidate.diameter,
            slope: candidate.slope,
            slope_selection: if input.slope.is_some() {
                SlopeSelection::Fixed
            } else {
                SlopeSelection::Auto
            },
            material: input.material,
            manning_n,
            design_flow: input.design_flow,
            full_flow_capacity: candidate.state.full_flow_capacity,
            velocity: candidate.state.velocity,
            depth_ratio: candidate.state.depth_ratio,
            capacity_utilization_percent: candidate.capacity_utilization_percent,
            is_capacity_adequate: feasible,
            is_velocity_adequate: feasible,
            minimum_flow,
            notes,
        })
    }

    /// Evaluate one diameter with the slope the engine would use for it
    ///
    /// # Errors
    /// Returns [`HydraulicsError::Configuration`] if the material has no
    /// Manning's n
    pub fn evaluate_diameter(
        &self,
        input: &GravityDesignInput,
        diameter: Millimetres,
    ) -> Result<Candidate, HydraulicsError> {
        let manning_n = self.table.manning_n(input.material)?;
        Ok(self.evaluate(input, manning_n, diameter, &self.limits(input.mode)))
    }

    /// Ladder entries at or above the caller's minimum diameter
    fn candidate_diameters(
        &self,
        input: &GravityDesignInput,
    ) -> Result<&'a [Millimetres], HydraulicsError> {
        HydraulicsError::require_positive("min_diameter_mm", input.min_diameter.value())?;
        let max = self.table.max_diameter();
        if input.min_diameter > max {
            return Err(HydraulicsError::input(
                "min_diameter_mm",
                format!(
                    "{} exceeds the largest standard diameter {max}",
                    input.min_diameter
                ),
            ));
        }

        let ladder = self.table.diameter_ladder();
        let first = ladder
            .iter()
            .position(|d| *d >= input.min_diameter)
            .unwrap_or(ladder.len());
        Ok(&ladder[first..])
    }

    fn limits(&self, mode: GravityMode) -> Limits {
        let t = self.table;
        Limits {
            min_velocity: MetresPerSecond::new(t.threshold(mode.min_velocity())),
            max_velocity: MetresPerSecond::new(t.threshold(mode.max_velocity())),
            capacity_ceiling: t.threshold(mode.capacity_ceiling()),
            slope_increment: SlopePercent::new(t.threshold(ThresholdName::SlopeIncrement)),
            max_auto_slope: SlopePercent::new(t.threshold(ThresholdName::MaxAutoSlope)),
        }
    }

    fn evaluate(
        &self,
        input: &GravityDesignInput,
        manning_n: f64,
        diameter: Millimetres,
        limits: &Limits,
    ) -> Candidate {
        let section = CircularSection::new(diameter);
        let slope = input.slope.unwrap_or_else(|| {
            self.auto_slope(&section, manning_n, diameter, input.design_flow, limits)
        });
        let state = FlowState::evaluate(&section, manning_n, slope, input.design_flow);
        let utilization = state.flow_ratio * 100.0;

        Candidate {
            diameter,
            slope,
            state,
            capacity_utilization_percent: utilization,
            is_capacity_adequate: state.flow_ratio <= limits.capacity_ceiling,
            is_velocity_adequate: state.velocity >= limits.min_velocity
                && state.velocity <= limits.max_velocity,
        }
    }

    /// `max(min grade, S_v)` rounded up to the slope increment and capped
    ///
    /// `S_v` is the smallest slope whose velocity at the design flow
    /// reaches the minimum. Velocity is non-decreasing in slope, so a
    /// bisection on the predicate finds it.
    fn auto_slope(
        &self,
        section: &CircularSection,
        manning_n: f64,
        diameter: Millimetres,
        flow: LitresPerSecond,
        limits: &Limits,
    ) -> SlopePercent {
        let reaches = |s: f64| {
            FlowState::evaluate(section, manning_n, SlopePercent::new(s), flow).velocity
                >= limits.min_velocity
        };

        let hi_bound = limits.max_auto_slope.value();
        let velocity_slope = if reaches(SLOPE_SEARCH_FLOOR) {
            SLOPE_SEARCH_FLOOR
        } else if !reaches(hi_bound) {
            hi_bound
        } else {
            let (mut lo, mut hi) = (SLOPE_SEARCH_FLOOR, hi_bound);
            for _ in 0..SLOPE_BISECTION_STEPS {
                let mid = 0.5 * (lo + hi);
                if reaches(mid) {
                    hi = mid;
                } else {
                    lo = mid;
                }
            }
            hi
        };

        let slope = self
            .table
            .min_grade(diameter)
            .max(SlopePercent::new(velocity_slope))
            .round_up_to(limits.slope_increment);
        if slope > limits.max_auto_slope {
            limits.max_auto_slope
        } else {
            slope
        }
    }

    fn minimum_flow_check(
        &self,
        input: &GravityDesignInput,
        manning_n: f64,
        candidate: &Candidate,
        notes: &mut Vec<String>,
    ) -> MinimumFlowCheck {
        let fraction = self.table.threshold(ThresholdName::MinimumFlowFraction);
        let threshold =
            MetresPerSecond::new(self.table.threshold(ThresholdName::SelfCleansingVelocity));
        let flow = input.design_flow * fraction;
        let section = CircularSection::new(candidate.diameter);
        let state = FlowState::evaluate(&section, manning_n, candidate.slope, flow);
        let is_self_cleansing = state.velocity >= threshold;

        if !is_self_cleansing {
            notes.push(format!(
                "minimum-flow velocity {:.2} at {:.0}% of design flow is below the {:.2} \
                 self-cleansing threshold",
                state.velocity,
                fraction * 100.0,
                threshold
            ));
        }

        MinimumFlowCheck {
            flow,
            velocity: state.velocity,
            depth_ratio: state.depth_ratio,
            is_self_cleansing,
        }
    }
}

fn infeasibility_notes(candidate: &Candidate, limits: &Limits, notes: &mut Vec<String>) {
    let at = format!("at maximum standard diameter {}", candidate.diameter);
    if !candidate.is_capacity_adequate {
        notes.push(format!(
            "capacity utilization {:.0}% exceeds {:.0}% ceiling {at}",
            candidate.capacity_utilization_percent,
            limits.capacity_ceiling * 100.0
        ));
    }
    let v = candidate.state.velocity;
    if v < limits.min_velocity {
        notes.push(format!(
            "velocity {v:.2} is below the {:.2} minimum {at}",
            limits.min_velocity
        ));
    } else if v > limits.max_velocity {
        notes.push(format!(
            "velocity {v:.2} exceeds the {:.2} maximum {at}",
            limits.max_velocity
        ));
    }
}
