//! Pressurized water service sizing
//!
//! Friction loss by Hazen-Williams (SI):
//!
//! ```text
//! h_L = 10.67 · L · (Q / C)^1.852 · D^-4.87
//! ```
//!
//! Residual pressure is the available pressure less the static lift and
//! the friction loss, both converted at 9.81 kPa per metre of head. A
//! diameter must hold the normal-service minimum at the peak domestic flow
//! and, when a fire flow is superimposed, the fire minimum at the combined
//! flow.

use crate::error::HydraulicsError;
use dssp_standards::{
    Kilopascals, LitresPerSecond, Material, Metres, MetresPerSecond, Millimetres, StandardsTable,
};
use std::f64::consts::PI;

const HAZEN_WILLIAMS_SI: f64 = 10.67;
const FLOW_EXPONENT: f64 = 1.852;
const DIAMETER_EXPONENT: f64 = 4.87;

/// Friction head loss over `length`
#[must_use]
pub fn hazen_williams_head_loss(
    flow: LitresPerSecond,
    length: Metres,
    diameter: Millimetres,
    c: f64,
) -> Metres {
    let q = flow.to_cubic_metres_per_second();
    let d = diameter.to_metres().value();
    Metres::new(
        HAZEN_WILLIAMS_SI
            * length.value()
            * (q / c).powf(FLOW_EXPONENT)
            * d.powf(-DIAMETER_EXPONENT),
    )
}

/// Mean velocity of `flow` through a full bore
#[must_use]
pub fn bore_velocity(flow: LitresPerSecond, diameter: Millimetres) -> MetresPerSecond {
    let d = diameter.to_metres().value();
    MetresPerSecond::new(flow.to_cubic_metres_per_second() / (PI * d * d / 4.0))
}

/// Pressurized sizing request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressurizedDesignInput {
    /// Peak-hour domestic demand
    pub domestic_flow: LitresPerSecond,
    /// Superimposed fire flow; zero when none is required
    pub fire_flow: LitresPerSecond,
    pub length: Metres,
    pub available_pressure: Kilopascals,
    /// Positive when the delivery point is higher than the source
    pub elevation_change: Metres,
    pub material: Material,
    /// Registry water minimum when `None`
    pub min_diameter: Option<Millimetres>,
}

impl PressurizedDesignInput {
    /// `domestic_flow + fire_flow`
    #[inline]
    #[must_use]
    pub fn design_flow(&self) -> LitresPerSecond {
        self.domestic_flow + self.fire_flow
    }

    #[inline]
    #[must_use]
    pub fn fire_flow_active(&self) -> bool {
        self.fire_flow.is_positive()
    }
}

/// Residual pressure while the fire flow is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireFlowCheck {
    /// Domestic peak plus fire flow
    pub flow: LitresPerSecond,
    pub head_loss: Metres,
    pub residual_pressure: Kilopascals,
}

/// Pressurized sizing outcome
#[derive(Debug, Clone, PartialEq)]
pub struct PressurizedSizing {
    pub diameter: Millimetres,
    pub material: Material,
    pub hazen_williams_c: f64,
    /// Domestic peak plus any fire flow
    pub design_flow: LitresPerSecond,
    /// Velocity at the design flow
    pub velocity: MetresPerSecond,
    /// Friction loss at the peak domestic flow
    pub head_loss: Metres,
    pub available_pressure: Kilopascals,
    /// Normal-service residual at the peak domestic flow
    pub residual_pressure: Kilopascals,
    pub min_pressure: Kilopascals,
    /// Present when a fire flow is superimposed
    pub fire: Option<FireFlowCheck>,
    pub fire_min_pressure: Kilopascals,
    pub is_pressure_adequate: bool,
    pub is_velocity_adequate: bool,
    pub is_fire_flow_adequate: bool,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct Trial {
    diameter: Millimetres,
    velocity: MetresPerSecond,
    head_loss: Metres,
    residual: Kilopascals,
    fire: Option<FireFlowCheck>,
    pressure_ok: bool,
    velocity_ok: bool,
    fire_ok: bool,
}

impl Trial {
    fn is_adequate(&self) -> bool {
        self.pressure_ok && self.velocity_ok && self.fire_ok
    }
}

/// Hazen-Williams water service sizing engine
#[derive(Debug, Clone, Copy)]
pub struct PressurizedSizingEngine<'a> {
    table: &'a StandardsTable,
}

impl<'a> PressurizedSizingEngine<'a> {
    #[inline]
    #[must_use]
    pub fn new(table: &'a StandardsTable) -> Self {
        Self { table }
    }

    /// Size a water service
    ///
    /// # Errors
    /// - [`HydraulicsError::InvalidInput`] for a non-positive domestic flow
    ///   or length, a negative fire flow or available pressure, a non-finite
    ///   elevation change, or a minimum diameter outside the ladder
    /// - [`HydraulicsError::Configuration`] if the material has no
    ///   Hazen-Williams C
    pub fn size(
        &self,
        input: &PressurizedDesignInput,
    ) -> Result<PressurizedSizing, HydraulicsError> {
        validate(input)?;
        let c = self.table.hazen_williams_c(input.material)?;
        let t = self.table.thresholds();
        let min_pressure = t.water_min_normal_pressure_kpa;
        let fire_min = t.water_min_fire_pressure_kpa;
        let max_velocity = t.water_max_velocity_ms;

        let min_diameter = input.min_diameter.unwrap_or(t.water_min_diameter_mm);
        HydraulicsError::require_positive("min_diameter_mm", min_diameter.value())?;
        if min_diameter > self.table.max_diameter() {
            return Err(HydraulicsError::input(
                "min_diameter_mm",
                format!(
                    "{min_diameter} exceeds the largest standard diameter {}",
                    self.table.max_diameter()
                ),
            ));
        }

        let static_loss = Kilopascals::from_head(input.elevation_change);
        let residual_at = |head_loss: Metres| {
            input.available_pressure - static_loss - Kilopascals::from_head(head_loss)
        };

        let mut chosen = None;
        let mut last = None;
        let ladder = self.table.diameter_ladder();
        for &diameter in ladder.iter().filter(|d| **d >= min_diameter) {
            let head_loss =
                hazen_williams_head_loss(input.domestic_flow, input.length, diameter, c);
            let residual = residual_at(head_loss);
            let fire = input.fire_flow_active().then(|| {
                let flow = input.design_flow();
                let head_loss = hazen_williams_head_loss(flow, input.length, diameter, c);
                FireFlowCheck {
                    flow,
                    head_loss,
                    residual_pressure: residual_at(head_loss),
                }
            });
            let velocity = bore_velocity(input.design_flow(), diameter);
            let trial = Trial {
                diameter,
                velocity,
                head_loss,
                residual,
                fire,
                pressure_ok: residual >= min_pressure,
                velocity_ok: velocity <= max_velocity,
                fire_ok: fire.map_or(true, |f| f.residual_pressure >= fire_min),
            };
            tracing::debug!(
                diameter_mm = diameter.value(),
                velocity_ms = velocity.value(),
                residual_kpa = residual.value(),
                fire_residual_kpa = fire.map(|f| f.residual_pressure.value()),
                "Evaluated water service diameter"
            );
            if trial.is_adequate() {
                chosen = Some(trial);
                break;
            }
            last = Some(trial);
        }

        let feasible = chosen.is_some();
        let Some(trial) = chosen.or(last) else {
            return Err(HydraulicsError::input(
                "min_diameter_mm",
                "no standard diameter at or above the minimum",
            ));
        };

        let mut notes = Vec::new();
        if feasible {
            tracing::info!(diameter_mm = trial.diameter.value(), "Water service sized");
        } else {
            let at = format!("at maximum standard diameter {}", trial.diameter);
            if !trial.pressure_ok {
                notes.push(format!(
                    "residual pressure {:.1} is below the {:.0} minimum {at}",
                    trial.residual, min_pressure
                ));
            }
            if !trial.velocity_ok {
                notes.push(format!(
                    "velocity {:.2} exceeds the {:.2} maximum {at}",
                    trial.velocity, max_velocity
                ));
            }
            tracing::warn!(
                diameter_mm = trial.diameter.value(),
                "No standard diameter satisfies pressure, velocity and fire flow"
            );
        }

        match trial.fire {
            Some(fire) if !trial.fire_ok => notes.push(format!(
                "residual pressure {:.1} under fire flow is below the {:.0} fire minimum",
                fire.residual_pressure, fire_min
            )),
            Some(_) => {}
            None => {
                notes.push("fire flow not required; fire-flow check not applicable".to_string());
            }
        }

        Ok(PressurizedSizing {
            diameter: trial.diameter,
            material: input.material,
            hazen_williams_c: c,
            design_flow: input.design_flow(),
            velocity: trial.velocity,
            head_loss: trial.head_loss,
            available_pressure: input.available_pressure,
            residual_pressure: trial.residual,
            min_pressure,
            fire: trial.fire,
            fire_min_pressure: fire_min,
            is_pressure_adequate: trial.pressure_ok,
            is_velocity_adequate: trial.velocity_ok,
            is_fire_flow_adequate: trial.fire_ok,
            notes,
        })
    }
}

fn validate(input: &PressurizedDesignInput) -> Result<(), HydraulicsError> {
    HydraulicsError::require_positive("design_flow_ls", input.domestic_flow.value())?;
    let fire = input.fire_flow.value();
    if !(fire.is_finite() && fire >= 0.0) {
        return Err(HydraulicsError::input(
            "fire_flow_ls",
            format!("must be non-negative, got {fire}"),
        ));
    }
    HydraulicsError::require_positive("length_m", input.length.value())?;
    let p = input.available_pressure.value();
    if !(p.is_finite() && p >= 0.0) {
        return Err(HydraulicsError::input(
            "available_pressure_kpa",
            format!("must be non-negative, got {p}"),
        ));
    }
    if !input.elevation_change.value().is_finite() {
        return Err(HydraulicsError::input("elevation_change_m", "must be a finite number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(flow: f64) -> PressurizedDesignInput {
        PressurizedDesignInput {
            domestic_flow: LitresPerSecond::new(flow),
            fire_flow: LitresPerSecond::new(0.0),
            length: Metres::new(150.0),
            available_pressure: Kilopascals::new(400.0),
            elevation_change: Metres::new(0.0),
            material: Material::DuctileIronNew,
            min_diameter: None,
        }
    }

    #[test]
    fn head_loss_reference() {
        let h = hazen_williams_head_loss(
            LitresPerSecond::new(10.0),
            Metres::new(100.0),
            Millimetres::new(150.0),
            140.0,
        );
        let expected = 10.67 * 100.0 * (0.01_f64 / 140.0).powf(1.852) * 0.15_f64.powf(-4.87);
        assert!((h.value() - expected).abs() < 1e-12);
    }

    #[test]
    fn residual_is_available_less_friction() {
        let table = StandardsTable::builtin();
        let result = PressurizedSizingEngine::new(&table).size(&service(3.5)).unwrap();
        let expected = 400.0 - 9.81 * result.head_loss.value();
        assert!((result.residual_pressure.value() - expected).abs() < 1e-9);
        assert_eq!(result.is_pressure_adequate, result.residual_pressure.value() >= 275.0);
        assert_eq!(result.diameter, Millimetres::new(150.0));
        assert!(result.is_fire_flow_adequate);
        assert!(result.fire.is_none());
        assert_eq!(result.min_pressure, Kilopascals::new(275.0));
    }

    #[test]
    fn fire_flow_uses_fire_minimum_and_limits_velocity() {
        let table = StandardsTable::builtin();
        let input = PressurizedDesignInput {
            fire_flow: LitresPerSecond::new(60.0),
            ..service(3.5)
        };
        let result = PressurizedSizingEngine::new(&table).size(&input).unwrap();
        assert_eq!(result.fire_min_pressure, Kilopascals::new(140.0));
        assert_eq!(result.min_pressure, Kilopascals::new(275.0));
        // 150 mm would run at about 3.6 m/s
        assert_eq!(result.diameter, Millimetres::new(200.0));
        assert!(result.velocity.value() <= 3.0);
        assert_eq!(result.design_flow, LitresPerSecond::new(63.5));

        let fire = result.fire.unwrap();
        assert_eq!(fire.flow, LitresPerSecond::new(63.5));
        assert!(fire.head_loss > result.head_loss);
        assert!(fire.residual_pressure < result.residual_pressure);
        let expected = 400.0 - 9.81 * fire.head_loss.value();
        assert!((fire.residual_pressure.value() - expected).abs() < 1e-9);
        assert!(result.is_pressure_adequate && result.is_fire_flow_adequate);
    }

    #[test]
    fn fire_flow_does_not_lower_the_normal_service_minimum() {
        let table = StandardsTable::builtin();
        let input = PressurizedDesignInput {
            available_pressure: Kilopascals::new(200.0),
            fire_flow: LitresPerSecond::new(60.0),
            ..service(3.5)
        };
        let result = PressurizedSizingEngine::new(&table).size(&input).unwrap();
        // 200 kPa clears the fire minimum but never the 275 kPa service minimum
        assert!(!result.is_pressure_adequate);
        assert!(result.is_fire_flow_adequate);
        assert!(result.is_velocity_adequate);
        assert_eq!(result.diameter, table.max_diameter());
        assert!(result.residual_pressure < result.min_pressure);
        assert!(result.fire.unwrap().residual_pressure >= result.fire_min_pressure);
        assert!(result.notes.iter().any(|n| n.contains("below the 275 kPa minimum")));
    }

    #[test]
    fn fire_residual_governs_when_service_pressure_is_ample() {
        let table = StandardsTable::builtin();
        let input = PressurizedDesignInput {
            length: Metres::new(2000.0),
            fire_flow: LitresPerSecond::new(60.0),
            ..service(3.5)
        };
        let result = PressurizedSizingEngine::new(&table).size(&input).unwrap();
        // 200 mm holds about 398 kPa in service but only about 59 kPa under fire flow
        let fire_at_200 = hazen_williams_head_loss(
            LitresPerSecond::new(63.5),
            input.length,
            Millimetres::new(200.0),
            140.0,
        );
        assert!(400.0 - 9.81 * fire_at_200.value() < 140.0);
        assert_eq!(result.diameter, Millimetres::new(250.0));
        assert!(result.fire.unwrap().residual_pressure >= Kilopascals::new(140.0));
        assert!(result.is_pressure_adequate && result.is_fire_flow_adequate);
    }

    #[test]
    fn elevation_lift_reduces_residual() {
        let table = StandardsTable::builtin();
        let engine = PressurizedSizingEngine::new(&table);
        let flat = engine.size(&service(3.5)).unwrap();
        let uphill = engine
            .size(&PressurizedDesignInput {
                elevation_change: Metres::new(10.0),
                ..service(3.5)
            })
            .unwrap();
        let drop = flat.residual_pressure.value() - uphill.residual_pressure.value();
        assert!((drop - 98.1).abs() < 1e-9);
    }

    #[test]
    fn infeasible_service_reports_largest_diameter() {
        let table = StandardsTable::builtin();
        let input = PressurizedDesignInput {
            elevation_change: Metres::new(40.0),
            ..service(3.5)
        };
        let result = PressurizedSizingEngine::new(&table).size(&input).unwrap();
        assert_eq!(result.diameter, table.max_diameter());
        assert!(!result.is_pressure_adequate);
        assert!(result.is_velocity_adequate);
        assert!(result.notes.iter().any(|n| n.contains("below the 275 kPa minimum")));
    }

    #[test]
    fn caller_minimum_diameter_is_honoured() {
        let table = StandardsTable::builtin();
        let input = PressurizedDesignInput {
            min_diameter: Some(Millimetres::new(100.0)),
            ..service(1.0)
        };
        let result = PressurizedSizingEngine::new(&table).size(&input).unwrap();
        assert_eq!(result.diameter, Millimetres::new(100.0));
    }

    #[test]
    fn invalid_inputs() {
        let table = StandardsTable::builtin();
        let engine = PressurizedSizingEngine::new(&table);
        let zero_length = PressurizedDesignInput {
            length: Metres::new(0.0),
            ..service(3.5)
        };
        assert_eq!(engine.size(&zero_length).unwrap_err().field(), Some("length_m"));

        let negative_pressure = PressurizedDesignInput {
            available_pressure: Kilopascals::new(-1.0),
            ..service(3.5)
        };
        assert_eq!(
            engine.size(&negative_pressure).unwrap_err().field(),
            Some("available_pressure_kpa")
        );

        let no_c = PressurizedDesignInput {
            material: Material::VitrifiedClay,
            ..service(3.5)
        };
        assert!(matches!(engine.size(&no_c), Err(HydraulicsError::Configuration(_))));

        let negative_fire = PressurizedDesignInput {
            fire_flow: LitresPerSecond::new(-5.0),
            ..service(3.5)
        };
        assert_eq!(engine.size(&negative_fire).unwrap_err().field(), Some("fire_flow_ls"));
    }
}
