//! Circular pipe section and part-full hydraulic elements
//!
//! Part-full ratios are functions of the central angle `θ` subtended by
//! the free surface:
//!
//! ```text
//! y/D   = (1 - cos(θ/2)) / 2
//! A/Af  = (θ - sin θ) / 2π
//! R/Rf  = 1 - sin θ / θ
//! Q/Qf  = (A/Af) (R/Rf)^(2/3)
//! V/Vf  = (R/Rf)^(2/3)
//! ```

use dssp_standards::{LitresPerSecond, MetresPerSecond, Millimetres, SlopePercent};
use std::f64::consts::PI;

/// Central angle at which `Q/Qf` peaks (about 0.938 depth)
pub const THETA_AT_MAX_FLOW: f64 = 5.278;

const BISECTION_STEPS: usize = 80;

/// Circular pipe flowing under gravity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularSection {
    diameter_m: f64,
}

impl CircularSection {
    #[inline]
    #[must_use]
    pub fn new(diameter: Millimetres) -> Self {
        Self {
            diameter_m: diameter.to_metres().value(),
        }
    }

    /// Flow area when full (m²)
    #[inline]
    #[must_use]
    pub fn full_area(&self) -> f64 {
        PI * self.diameter_m * self.diameter_m / 4.0
    }

    /// Hydraulic radius when full (m)
    #[inline]
    #[must_use]
    pub fn full_hydraulic_radius(&self) -> f64 {
        self.diameter_m / 4.0
    }

    /// Manning full-flow capacity: `Q = (1/n) A R^(2/3) S^(1/2)`
    #[must_use]
    pub fn full_flow_capacity(&self, manning_n: f64, slope: SlopePercent) -> LitresPerSecond {
        let q = self.full_area() * self.full_hydraulic_radius().powf(2.0 / 3.0)
            * slope.as_fraction().max(0.0).sqrt()
            / manning_n;
        LitresPerSecond::from_cubic_metres_per_second(q)
    }

    /// Mean velocity when full
    #[must_use]
    pub fn full_velocity(&self, manning_n: f64, slope: SlopePercent) -> MetresPerSecond {
        let q = self.full_flow_capacity(manning_n, slope).to_cubic_metres_per_second();
        MetresPerSecond::new(q / self.full_area())
    }

    /// Velocity of `flow` spread over the full bore
    #[inline]
    #[must_use]
    pub fn bore_velocity(&self, flow: LitresPerSecond) -> MetresPerSecond {
        MetresPerSecond::new(flow.to_cubic_metres_per_second() / self.full_area())
    }
}

/// Part-full hydraulic element ratios
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialFlow {
    /// Central angle (radians)
    pub theta: f64,
    /// `y/D`
    pub depth_ratio: f64,
    /// `A/Af`
    pub area_ratio: f64,
    /// `R/Rf`
    pub radius_ratio: f64,
    /// `Q/Qf`
    pub flow_ratio: f64,
    /// `V/Vf`
    pub velocity_ratio: f64,
}

impl PartialFlow {
    /// Elements at central angle `theta` in `(0, 2π]`
    #[must_use]
    pub fn at_angle(theta: f64) -> Self {
        let area_ratio = (theta - theta.sin()) / (2.0 * PI);
        let radius_ratio = 1.0 - theta.sin() / theta;
        let velocity_ratio = radius_ratio.max(0.0).powf(2.0 / 3.0);
        Self {
            theta,
            depth_ratio: (1.0 - (theta / 2.0).cos()) / 2.0,
            area_ratio,
            radius_ratio,
            flow_ratio: area_ratio * velocity_ratio,
            velocity_ratio,
        }
    }

    /// Elements producing `Q/Qf = flow_ratio`
    ///
    /// Solved by bisection on the rising branch `0 < θ ≤ 5.278`, where
    /// `Q/Qf` is monotone. Returns `None` for ratios above 1 (surcharged)
    /// and for non-positive ratios.
    #[must_use]
    pub fn for_flow_ratio(flow_ratio: f64) -> Option<Self> {
        if !(flow_ratio > 0.0 && flow_ratio <= 1.0) {
            return None;
        }
        let (mut lo, mut hi) = (0.0_f64, THETA_AT_MAX_FLOW);
        for _ in 0..BISECTION_STEPS {
            let mid = 0.5 * (lo + hi);
            if Self::at_angle(mid).flow_ratio < flow_ratio {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some(Self::at_angle(0.5 * (lo + hi)))
    }
}

/// Flow state of a gravity pipe carrying a given flow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowState {
    pub full_flow_capacity: LitresPerSecond,
    pub full_velocity: MetresPerSecond,
    /// `Q/Qf`
    pub flow_ratio: f64,
    /// `y/D`, 1 when surcharged
    pub depth_ratio: f64,
    /// Actual mean velocity
    pub velocity: MetresPerSecond,
    pub surcharged: bool,
}

impl FlowState {
    /// Evaluate `flow` in `section` at `slope`
    #[must_use]
    pub fn evaluate(
        section: &CircularSection,
        manning_n: f64,
        slope: SlopePercent,
        flow: LitresPerSecond,
    ) -> Self {
        let full_flow_capacity = section.full_flow_capacity(manning_n, slope);
        let full_velocity = section.full_velocity(manning_n, slope);
        let flow_ratio = if full_flow_capacity.is_positive() {
            flow.value() / full_flow_capacity.value()
        } else {
            f64::INFINITY
        };

        match PartialFlow::for_flow_ratio(flow_ratio) {
            Some(partial) => Self {
                full_flow_capacity,
                full_velocity,
                flow_ratio,
                depth_ratio: partial.depth_ratio,
                velocity: full_velocity * partial.velocity_ratio,
                surcharged: false,
            },
            None if flow_ratio > 1.0 => Self {
                full_flow_capacity,
                full_velocity,
                flow_ratio,
                depth_ratio: 1.0,
                velocity: section.bore_velocity(flow),
                surcharged: true,
            },
            None => Self {
                full_flow_capacity,
                full_velocity,
                flow_ratio: 0.0,
                depth_ratio: 0.0,
                velocity: MetresPerSecond::default(),
                surcharged: false,
            },
        }
    }
}
