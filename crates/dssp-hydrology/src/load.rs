//! Tributary loads shared by the sanitary and water demand estimators

use crate::error::HydrologyError;
use dssp_standards::{DemandRates, Hectares, LandUse, LitresPerSecond, StandardsTable};

/// Resident count, either direct or derived from dwelling units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Residents {
    /// Known population
    Population(f64),
    /// Dwelling units, converted with the land-use occupancy factor
    DwellingUnits(u32),
}

/// What a load's base flow is derived from
///
/// At least one of the two is present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadBasis {
    residents: Option<Residents>,
    employees: Option<u32>,
}

impl LoadBasis {
    #[inline]
    #[must_use]
    pub fn residents(&self) -> Option<Residents> {
        self.residents
    }

    #[inline]
    #[must_use]
    pub fn employees(&self) -> Option<u32> {
        self.employees
    }
}

/// One tributary source feeding a sanitary sewer or water service
#[derive(Debug, Clone, PartialEq)]
pub struct TributaryLoad {
    id: String,
    land_use: LandUse,
    area: Hectares,
    basis: LoadBasis,
}

/// Load on a sanitary sewer
pub type SanitaryLoad = TributaryLoad;

/// Load on a water service
pub type WaterLoad = TributaryLoad;

impl TributaryLoad {
    /// Create a load
    ///
    /// A known population takes precedence over dwelling units.
    ///
    /// # Errors
    /// Returns [`HydrologyError::InvalidLoadInput`] if no basis is given,
    /// the area is not positive, or the population is negative
    pub fn new(
        id: impl Into<String>,
        land_use: LandUse,
        area: Hectares,
        dwelling_units: Option<u32>,
        population: Option<f64>,
        employees: Option<u32>,
    ) -> Result<Self, HydrologyError> {
        let id = id.into();
        if !area.is_positive() {
            return Err(HydrologyError::load(
                &id,
                "area_ha",
                format!("must be greater than zero, got {}", area.value()),
            ));
        }
        if let Some(p) = population {
            if !(p.is_finite() && p >= 0.0) {
                return Err(HydrologyError::load(
                    &id,
                    "population",
                    format!("must be a non-negative number, got {p}"),
                ));
            }
        }

        let residents = population
            .map(Residents::Population)
            .or(dwelling_units.map(Residents::DwellingUnits));
        if residents.is_none() && employees.is_none() {
            return Err(HydrologyError::load(
                &id,
                "dwelling_units",
                "load needs dwelling units, population or employees",
            ));
        }

        Ok(Self {
            id,
            land_use,
            area,
            basis: LoadBasis {
                residents,
                employees,
            },
        })
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn land_use(&self) -> LandUse {
        self.land_use
    }

    #[inline]
    #[must_use]
    pub fn area(&self) -> Hectares {
        self.area
    }

    #[inline]
    #[must_use]
    pub fn basis(&self) -> LoadBasis {
        self.basis
    }
}

/// Base demand derived for a single load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadDemand {
    pub id: String,
    /// Resident population (direct or from dwelling units)
    pub population: f64,
    /// Population equivalent of residents plus employees
    pub equivalent_population: f64,
    /// Average daily flow
    pub base_flow: LitresPerSecond,
}

/// Average daily demand for one load under a set of unit rates
///
/// # Errors
/// Returns [`HydrologyError::Configuration`] if dwelling units must be
/// converted and the land use has no occupancy entry
pub fn load_demand(
    table: &StandardsTable,
    rates: &DemandRates,
    load: &TributaryLoad,
) -> Result<LoadDemand, HydrologyError> {
    let population = match load.basis.residents {
        Some(Residents::Population(p)) => p,
        Some(Residents::DwellingUnits(units)) => {
            f64::from(units) * table.occupancy(load.land_use)?
        }
        None => 0.0,
    };
    let employees = load.basis.employees.map_or(0.0, f64::from);

    let litres_per_day = population * rates.per_capita_lpcd + employees * rates.per_employee_lped;

    Ok(LoadDemand {
        id: load.id.clone(),
        population,
        equivalent_population: litres_per_day / rates.per_capita_lpcd,
        base_flow: LitresPerSecond::from_litres_per_day(litres_per_day),
    })
}

/// Demand of every load draining to one pipe
///
/// The peaking factor is taken on the combined population equivalent, so
/// adding a load never peaks harder than the loads did on their own.
#[derive(Debug, Clone, PartialEq)]
pub struct TributaryDemand {
    pub loads: Vec<LoadDemand>,
    /// Total resident population
    pub population: f64,
    /// Total population equivalent
    pub equivalent_population: f64,
    /// Sum of average daily flows
    pub average_flow: LitresPerSecond,
    pub peaking_factor: f64,
    /// `average_flow × peaking_factor`
    pub peak_flow: LitresPerSecond,
}

/// Combined base and peak demand for a group of loads
///
/// # Errors
/// - [`HydrologyError::InvalidInput`] if `loads` is empty
/// - [`HydrologyError::Configuration`] if a land use lacks an occupancy
pub fn tributary_demand(
    table: &StandardsTable,
    rates: &DemandRates,
    loads: &[TributaryLoad],
) -> Result<TributaryDemand, HydrologyError> {
    if loads.is_empty() {
        return Err(HydrologyError::input("loads", "at least one load is required"));
    }

    let demands = loads
        .iter()
        .map(|load| load_demand(table, rates, load))
        .collect::<Result<Vec<_>, _>>()?;

    let population: f64 = demands.iter().map(|d| d.population).sum();
    let equivalent_population: f64 = demands.iter().map(|d| d.equivalent_population).sum();
    let average_flow: LitresPerSecond = demands.iter().map(|d| d.base_flow).sum();
    let peaking_factor = rates.peaking.factor(equivalent_population);

    Ok(TributaryDemand {
        loads: demands,
        population,
        equivalent_population,
        average_flow,
        peaking_factor,
        peak_flow: average_flow * peaking_factor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_wins_over_dwelling_units() {
        let load = TributaryLoad::new(
            "L1",
            LandUse::SingleFamily,
            Hectares::new(1.0),
            Some(60),
            Some(100.0),
            None,
        )
        .unwrap();
        assert_eq!(load.basis().residents(), Some(Residents::Population(100.0)));
    }

    #[test]
    fn no_basis_is_rejected() {
        let err = TributaryLoad::new("L1", LandUse::Park, Hectares::new(1.0), None, None, None)
            .unwrap_err();
        assert!(matches!(err, HydrologyError::InvalidLoadInput { .. }));
    }

    #[test]
    fn negative_population_is_rejected() {
        let err = TributaryLoad::new(
            "L1",
            LandUse::Apartment,
            Hectares::new(1.0),
            None,
            Some(-5.0),
            None,
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("population"));
    }

    #[test]
    fn dwelling_units_use_occupancy() {
        let table = StandardsTable::builtin();
        let load = TributaryLoad::new(
            "L1",
            LandUse::SingleFamily,
            Hectares::new(2.5),
            Some(60),
            None,
            None,
        )
        .unwrap();
        let demand = load_demand(&table, table.sanitary_demand(), &load).unwrap();
        assert!((demand.population - 180.0).abs() < 1e-9);

        let base = 180.0 * 350.0 / 86_400.0;
        assert!((demand.base_flow.value() - base).abs() < 1e-12);
    }

    #[test]
    fn employees_add_equivalent_population() {
        let table = StandardsTable::builtin();
        let rates = table.sanitary_demand();
        let load = TributaryLoad::new(
            "office",
            LandUse::Commercial,
            Hectares::new(0.8),
            None,
            None,
            Some(350),
        )
        .unwrap();
        let demand = load_demand(&table, rates, &load).unwrap();
        assert!((demand.population).abs() < 1e-12);
        assert!((demand.equivalent_population - 350.0 * 60.0 / 350.0).abs() < 1e-9);
    }

    #[test]
    fn tributary_population_sets_the_peaking_factor() {
        let table = StandardsTable::builtin();
        let rates = table.sanitary_demand();
        let small = TributaryLoad::new(
            "a",
            LandUse::SingleFamily,
            Hectares::new(1.0),
            Some(40),
            None,
            None,
        )
        .unwrap();
        let large = TributaryLoad::new(
            "b",
            LandUse::SingleFamily,
            Hectares::new(9.0),
            Some(900),
            None,
            None,
        )
        .unwrap();

        let alone = tributary_demand(&table, rates, std::slice::from_ref(&small)).unwrap();
        // 120 people peak at the cap on their own
        assert!((alone.peaking_factor - 4.0).abs() < 1e-12);

        let both = tributary_demand(&table, rates, &[small, large]).unwrap();
        assert!((both.equivalent_population - 2820.0).abs() < 1e-9);
        let expected = 1.0 + 14.0 / (4.0 + 2.82_f64.sqrt());
        assert!((both.peaking_factor - expected).abs() < 1e-12);
        assert!((both.peak_flow.value() - both.average_flow.value() * expected).abs() < 1e-12);
    }

    #[test]
    fn empty_tributary_rejected() {
        let table = StandardsTable::builtin();
        let err = tributary_demand(&table, table.water_demand(), &[]).unwrap_err();
        assert_eq!(err.field(), Some("loads"));
    }
}
