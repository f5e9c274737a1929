//! Standards table
//!
//! [`StandardsTable`] is the immutable registry every engine reads from:
//! roughness per material, runoff/occupancy/fire flow per land use,
//! named thresholds, unit demand rates, IDF coefficients, the standard
//! diameter ladder and minimum grades.

use crate::catalog::{LandUse, Material, ReturnPeriod, ThresholdName};
use crate::error::{ConfigurationError, UnsupportedReturnPeriod};
use crate::units::{
    Kilopascals, LitresPerSecond, MetresPerSecond, Millimetres, Minutes, SlopePercent,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Version tag of the built-in table
pub const BUILTIN_VERSION: &str = "dssp-2024.1";

/// Roughness coefficients registered for a material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialRoughness {
    /// Material key
    pub material: Material,
    /// Manning's n (gravity flow)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manning_n: Option<f64>,
    /// Hazen-Williams C (pressurized flow)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hazen_williams_c: Option<f64>,
}

/// Runoff coefficient with its acceptable range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunoffCoefficient {
    /// Default value
    pub value: f64,
    /// Lower bound of the typical range
    pub min: f64,
    /// Upper bound of the typical range
    pub max: f64,
}

impl RunoffCoefficient {
    /// Check whether `c` lies inside the typical range
    #[inline]
    #[must_use]
    pub fn contains(&self, c: f64) -> bool {
        c >= self.min && c <= self.max
    }
}

/// Per-land-use design values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandUseStandard {
    /// Land-use key
    pub land_use: LandUse,
    /// Runoff coefficient and range
    pub runoff: RunoffCoefficient,
    /// Persons per dwelling unit
    pub occupancy_per_unit: f64,
    /// Required fire flow
    pub fire_flow_ls: LitresPerSecond,
}

/// Named numeric thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub storm_min_velocity_ms: MetresPerSecond,
    pub storm_max_velocity_ms: MetresPerSecond,
    pub storm_capacity_ceiling: f64,
    pub sanitary_min_velocity_ms: MetresPerSecond,
    pub sanitary_max_velocity_ms: MetresPerSecond,
    pub sanitary_capacity_ceiling: f64,
    pub self_cleansing_velocity_ms: MetresPerSecond,
    pub minimum_flow_fraction: f64,
    pub water_min_normal_pressure_kpa: Kilopascals,
    pub water_min_fire_pressure_kpa: Kilopascals,
    pub water_max_velocity_ms: MetresPerSecond,
    pub min_time_of_concentration_min: Minutes,
    pub infiltration_ls_per_ha: f64,
    pub slope_increment_percent: SlopePercent,
    pub max_auto_slope_percent: SlopePercent,
    pub storm_min_diameter_mm: Millimetres,
    pub sanitary_min_diameter_mm: Millimetres,
    pub water_min_diameter_mm: Millimetres,
}

impl Thresholds {
    /// Look up a threshold by name
    #[must_use]
    pub fn get(&self, name: ThresholdName) -> f64 {
        match name {
            ThresholdName::StormMinVelocity => self.storm_min_velocity_ms.value(),
            ThresholdName::StormMaxVelocity => self.storm_max_velocity_ms.value(),
            ThresholdName::StormCapacityCeiling => self.storm_capacity_ceiling,
            ThresholdName::SanitaryMinVelocity => self.sanitary_min_velocity_ms.value(),
            ThresholdName::SanitaryMaxVelocity => self.sanitary_max_velocity_ms.value(),
            ThresholdName::SanitaryCapacityCeiling => self.sanitary_capacity_ceiling,
            ThresholdName::SelfCleansingVelocity => self.self_cleansing_velocity_ms.value(),
            ThresholdName::MinimumFlowFraction => self.minimum_flow_fraction,
            ThresholdName::WaterMinNormalPressure => self.water_min_normal_pressure_kpa.value(),
            ThresholdName::WaterMinFirePressure => self.water_min_fire_pressure_kpa.value(),
            ThresholdName::WaterMaxVelocity => self.water_max_velocity_ms.value(),
            ThresholdName::MinTimeOfConcentration => self.min_time_of_concentration_min.value(),
            ThresholdName::InfiltrationRate => self.infiltration_ls_per_ha,
            ThresholdName::SlopeIncrement => self.slope_increment_percent.value(),
            ThresholdName::MaxAutoSlope => self.max_auto_slope_percent.value(),
            ThresholdName::StormMinDiameter => self.storm_min_diameter_mm.value(),
            ThresholdName::SanitaryMinDiameter => self.sanitary_min_diameter_mm.value(),
            ThresholdName::WaterMinDiameter => self.water_min_diameter_mm.value(),
        }
    }
}

/// Harmon-type peaking parameters
///
/// `PF = 1 + numerator / (offset + sqrt(P / 1000))`, clamped to
/// `[floor, cap]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakingParameters {
    pub numerator: f64,
    pub offset: f64,
    /// Minimum multiplier
    pub floor: f64,
    /// Maximum multiplier
    pub cap: f64,
}

impl PeakingParameters {
    /// Peaking factor for a tributary population
    ///
    /// Non-increasing in `population`; never below `floor`.
    #[must_use]
    pub fn factor(&self, population: f64) -> f64 {
        let thousands = (population.max(0.0) / 1000.0).sqrt();
        let harmon = 1.0 + self.numerator / (self.offset + thousands);
        harmon.clamp(self.floor, self.cap)
    }
}

/// Unit demand rates for one service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandRates {
    /// Litres per capita per day
    pub per_capita_lpcd: f64,
    /// Litres per employee per day
    pub per_employee_lped: f64,
    /// Peaking curve
    pub peaking: PeakingParameters,
}

/// IDF regression triple: `i = a / (t + b)^c`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdfCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// IDF coefficients registered for one return period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdfEntry {
    pub return_period_years: ReturnPeriod,
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl IdfEntry {
    /// Regression triple of this entry
    #[inline]
    #[must_use]
    pub fn coefficients(&self) -> IdfCoefficients {
        IdfCoefficients {
            a: self.a,
            b: self.b,
            c: self.c,
        }
    }
}

/// Minimum permitted grade from a diameter upward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimumGrade {
    pub diameter_mm: Millimetres,
    pub min_slope_percent: SlopePercent,
}

/// Versioned, immutable design-standards registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardsTable {
    version: String,
    diameters_mm: Vec<Millimetres>,
    thresholds: Thresholds,
    sanitary_demand: DemandRates,
    water_demand: DemandRates,
    idf: Vec<IdfEntry>,
    min_grades: Vec<MinimumGrade>,
    materials: Vec<MaterialRoughness>,
    land_uses: Vec<LandUseStandard>,
}

impl StandardsTable {
    /// Built-in municipal standards
    #[must_use]
    pub fn builtin() -> Self {
        let materials = [
            (Material::Pvc, Some(0.011), Some(150.0)),
            (Material::Hdpe, Some(0.012), Some(150.0)),
            (Material::Concrete, Some(0.013), Some(120.0)),
            (Material::VitrifiedClay, Some(0.013), None),
            (Material::DuctileIronNew, Some(0.013), Some(140.0)),
            (Material::DuctileIronOld, Some(0.015), Some(100.0)),
            (Material::CastIron, None, Some(100.0)),
            (Material::CorrugatedSteel, Some(0.024), None),
            (Material::Copper, None, Some(140.0)),
        ]
        .into_iter()
        .map(|(material, manning_n, hazen_williams_c)| {
            MaterialRoughness {
                material,
                manning_n,
                hazen_williams_c,
            }
        })
        .collect();

        let land_uses = [
            (LandUse::SingleFamily, (0.35, 0.30, 0.45), 3.0, 60.0),
            (LandUse::Townhouse, (0.55, 0.45, 0.65), 2.7, 90.0),
            (LandUse::Apartment, (0.65, 0.55, 0.75), 1.9, 150.0),
            (LandUse::Commercial, (0.85, 0.75, 0.95), 2.5, 150.0),
            (LandUse::Industrial, (0.80, 0.70, 0.90), 2.5, 225.0),
            (LandUse::Institutional, (0.70, 0.60, 0.80), 2.5, 150.0),
            (LandUse::Park, (0.20, 0.10, 0.30), 2.5, 0.0),
            (LandUse::Roadway, (0.90, 0.85, 0.95), 2.5, 0.0),
        ]
        .into_iter()
        .map(|(land_use, (value, min, max), occupancy, fire_flow)| {
            LandUseStandard {
                land_use,
                runoff: RunoffCoefficient { value, min, max },
                occupancy_per_unit: occupancy,
                fire_flow_ls: LitresPerSecond::new(fire_flow),
            }
        })
        .collect();

        let thresholds = Thresholds {
            storm_min_velocity_ms: MetresPerSecond::new(0.9),
            storm_max_velocity_ms: MetresPerSecond::new(6.0),
            storm_capacity_ceiling: 0.80,
            sanitary_min_velocity_ms: MetresPerSecond::new(0.6),
            sanitary_max_velocity_ms: MetresPerSecond::new(3.5),
            sanitary_capacity_ceiling: 0.75,
            self_cleansing_velocity_ms: MetresPerSecond::new(0.45),
            minimum_flow_fraction: 0.30,
            water_min_normal_pressure_kpa: Kilopascals::new(275.0),
            water_min_fire_pressure_kpa: Kilopascals::new(140.0),
            water_max_velocity_ms: MetresPerSecond::new(3.0),
            min_time_of_concentration_min: Minutes::new(10.0),
            infiltration_ls_per_ha: 0.10,
            slope_increment_percent: SlopePercent::new(0.01),
            max_auto_slope_percent: SlopePercent::new(15.0),
            storm_min_diameter_mm: Millimetres::new(300.0),
            sanitary_min_diameter_mm: Millimetres::new(200.0),
            water_min_diameter_mm: Millimetres::new(150.0),
        };

        let idf = [
            (ReturnPeriod::Y2, 720.0, 6.0, 0.78),
            (ReturnPeriod::Y5, 990.0, 6.5, 0.79),
            (ReturnPeriod::Y10, 1170.0, 7.0, 0.80),
            (ReturnPeriod::Y25, 1400.0, 7.5, 0.80),
            (ReturnPeriod::Y50, 1580.0, 8.0, 0.81),
            (ReturnPeriod::Y100, 1760.0, 8.5, 0.81),
        ]
        .into_iter()
        .map(|(return_period_years, a, b, c)| IdfEntry {
            return_period_years,
            a,
            b,
            c,
        })
        .collect();

        let diameters_mm = [
            100.0, 150.0, 200.0, 250.0, 300.0, 375.0, 450.0, 525.0, 600.0, 675.0, 750.0, 825.0,
            900.0, 1050.0, 1200.0, 1350.0, 1500.0,
        ]
        .into_iter()
        .map(Millimetres::new)
        .collect();

        let min_grades = [
            (100.0, 0.60),
            (150.0, 0.50),
            (200.0, 0.40),
            (250.0, 0.28),
            (300.0, 0.22),
            (375.0, 0.15),
            (450.0, 0.12),
            (525.0, 0.10),
        ]
        .into_iter()
        .map(|(d, s)| MinimumGrade {
            diameter_mm: Millimetres::new(d),
            min_slope_percent: SlopePercent::new(s),
        })
        .collect();

        Self {
            version: BUILTIN_VERSION.to_string(),
            materials,
            land_uses,
            thresholds,
            sanitary_demand: DemandRates {
                per_capita_lpcd: 350.0,
                per_employee_lped: 60.0,
                peaking: PeakingParameters {
                    numerator: 14.0,
                    offset: 4.0,
                    floor: 2.0,
                    cap: 4.0,
                },
            },
            water_demand: DemandRates {
                per_capita_lpcd: 400.0,
                per_employee_lped: 80.0,
                peaking: PeakingParameters {
                    numerator: 14.0,
                    offset: 4.0,
                    floor: 2.5,
                    cap: 4.5,
                },
            },
            idf,
            diameters_mm,
            min_grades,
        }
    }

    /// Table version tag
    #[inline]
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Replace the thresholds, returning a new table
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Replace the version tag, returning a new table
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// All named thresholds
    #[inline]
    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Look up a threshold by name
    #[inline]
    #[must_use]
    pub fn threshold(&self, name: ThresholdName) -> f64 {
        self.thresholds.get(name)
    }

    /// Look up a threshold by string key
    ///
    /// # Errors
    /// Returns [`ConfigurationError::UnknownKey`] for an unrecognised name
    pub fn threshold_by_key(&self, key: &str) -> Result<f64, ConfigurationError> {
        Ok(self.threshold(key.parse()?))
    }

    /// Runoff coefficient for a land use
    ///
    /// # Errors
    /// Returns [`ConfigurationError::UnknownKey`] if the table has no entry
    pub fn runoff_coefficient(
        &self,
        land_use: LandUse,
    ) -> Result<RunoffCoefficient, ConfigurationError> {
        Ok(self.land_use(land_use)?.runoff)
    }

    /// Persons per dwelling unit for a land use
    ///
    /// # Errors
    /// Returns [`ConfigurationError::UnknownKey`] if the table has no entry
    pub fn occupancy(&self, land_use: LandUse) -> Result<f64, ConfigurationError> {
        Ok(self.land_use(land_use)?.occupancy_per_unit)
    }

    /// Required fire flow for a land use
    ///
    /// # Errors
    /// Returns [`ConfigurationError::UnknownKey`] if the table has no entry
    pub fn fire_flow(&self, land_use: LandUse) -> Result<LitresPerSecond, ConfigurationError> {
        Ok(self.land_use(land_use)?.fire_flow_ls)
    }

    /// Full per-land-use record
    ///
    /// # Errors
    /// Returns [`ConfigurationError::UnknownKey`] if the table has no entry
    pub fn land_use(&self, land_use: LandUse) -> Result<&LandUseStandard, ConfigurationError> {
        self.land_uses
            .iter()
            .find(|s| s.land_use == land_use)
            .ok_or_else(|| ConfigurationError::unknown_key("land_use", land_use.key()))
    }

    /// Manning's n for a material
    ///
    /// # Errors
    /// Returns an error if the material is absent or has no Manning's n
    pub fn manning_n(&self, material: Material) -> Result<f64, ConfigurationError> {
        self.roughness(material)?
            .manning_n
            .ok_or_else(|| ConfigurationError::MissingRoughness {
                material: material.key().to_string(),
                kind: "manning_n",
            })
    }

    /// Hazen-Williams C for a material
    ///
    /// # Errors
    /// Returns an error if the material is absent or has no Hazen-Williams C
    pub fn hazen_williams_c(&self, material: Material) -> Result<f64, ConfigurationError> {
        self.roughness(material)?
            .hazen_williams_c
            .ok_or_else(|| ConfigurationError::MissingRoughness {
                material: material.key().to_string(),
                kind: "hazen_williams_c",
            })
    }

    /// Roughness record for a material
    ///
    /// # Errors
    /// Returns [`ConfigurationError::UnknownKey`] if the table has no entry
    pub fn roughness(&self, material: Material) -> Result<&MaterialRoughness, ConfigurationError> {
        self.materials
            .iter()
            .find(|r| r.material == material)
            .ok_or_else(|| ConfigurationError::unknown_key("material", material.key()))
    }

    /// IDF coefficients for a return period
    ///
    /// # Errors
    /// Returns [`UnsupportedReturnPeriod`] if the period has no coefficients
    pub fn idf(&self, period: ReturnPeriod) -> Result<IdfCoefficients, UnsupportedReturnPeriod> {
        self.idf
            .iter()
            .find(|entry| entry.return_period_years == period)
            .map(IdfEntry::coefficients)
            .ok_or(UnsupportedReturnPeriod {
                years: period.years(),
            })
    }

    /// Return periods with registered coefficients, ascending
    #[must_use]
    pub fn return_periods(&self) -> Vec<ReturnPeriod> {
        let mut periods: Vec<_> = self.idf.iter().map(|e| e.return_period_years).collect();
        periods.sort_unstable();
        periods
    }

    /// Sanitary unit demand rates
    #[inline]
    #[must_use]
    pub fn sanitary_demand(&self) -> &DemandRates {
        &self.sanitary_demand
    }

    /// Water unit demand rates
    #[inline]
    #[must_use]
    pub fn water_demand(&self) -> &DemandRates {
        &self.water_demand
    }

    /// Standard nominal diameters, strictly ascending
    #[inline]
    #[must_use]
    pub fn diameter_ladder(&self) -> &[Millimetres] {
        &self.diameters_mm
    }

    /// Largest standard diameter
    #[must_use]
    pub fn max_diameter(&self) -> Millimetres {
        self.diameters_mm.last().copied().unwrap_or_default()
    }

    /// Minimum permitted grade for a diameter
    ///
    /// Uses the entry with the largest diameter not exceeding `diameter`;
    /// diameters below the first entry take the first entry's grade.
    #[must_use]
    pub fn min_grade(&self, diameter: Millimetres) -> SlopePercent {
        self.min_grades
            .iter()
            .rev()
            .find(|g| g.diameter_mm <= diameter)
            .or_else(|| self.min_grades.first())
            .map_or(SlopePercent::default(), |g| g.min_slope_percent)
    }

    /// Check internal consistency
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidTable`] describing the first
    /// inconsistency found
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.version.trim().is_empty() {
            return Err(ConfigurationError::invalid("version must not be empty"));
        }

        if self.diameters_mm.is_empty() {
            return Err(ConfigurationError::invalid("diameter ladder is empty"));
        }
        if !self.diameters_mm.iter().all(|d| d.is_positive()) {
            return Err(ConfigurationError::invalid("diameters must be positive"));
        }
        if self.diameters_mm.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigurationError::invalid(
                "diameter ladder must be strictly ascending",
            ));
        }
        if self.min_grades.windows(2).any(|w| w[0].diameter_mm >= w[1].diameter_mm) {
            return Err(ConfigurationError::invalid(
                "minimum grades must be listed by ascending diameter",
            ));
        }
        if self.min_grades.iter().any(|g| !g.min_slope_percent.is_positive()) {
            return Err(ConfigurationError::invalid("minimum grades must be positive"));
        }

        let mut seen_materials = BTreeSet::new();
        for r in &self.materials {
            let material = r.material;
            if !seen_materials.insert(material) {
                return Err(ConfigurationError::invalid(format!(
                    "material '{material}' listed more than once"
                )));
            }
            let bad = |v: Option<f64>| v.is_some_and(|x| !(x.is_finite() && x > 0.0));
            if bad(r.manning_n) || bad(r.hazen_williams_c) {
                return Err(ConfigurationError::invalid(format!(
                    "roughness for '{material}' must be positive"
                )));
            }
        }

        let mut seen_land_uses = BTreeSet::new();
        for s in &self.land_uses {
            let land_use = s.land_use;
            if !seen_land_uses.insert(land_use) {
                return Err(ConfigurationError::invalid(format!(
                    "land use '{land_use}' listed more than once"
                )));
            }
            let r = s.runoff;
            if !(0.0..=1.0).contains(&r.min) || !(0.0..=1.0).contains(&r.max) || r.min > r.max {
                return Err(ConfigurationError::invalid(format!(
                    "runoff range for '{land_use}' must satisfy 0 <= min <= max <= 1"
                )));
            }
            if !r.contains(r.value) {
                return Err(ConfigurationError::invalid(format!(
                    "default runoff for '{land_use}' lies outside its range"
                )));
            }
            if s.occupancy_per_unit <= 0.0 || s.fire_flow_ls.value() < 0.0 {
                return Err(ConfigurationError::invalid(format!(
                    "occupancy and fire flow for '{land_use}' must be non-negative"
                )));
            }
        }

        let t = &self.thresholds;
        if t.storm_min_velocity_ms >= t.storm_max_velocity_ms
            || t.sanitary_min_velocity_ms >= t.sanitary_max_velocity_ms
        {
            return Err(ConfigurationError::invalid(
                "minimum velocity must be below maximum velocity",
            ));
        }
        for (name, fraction) in [
            ("storm_capacity_ceiling", t.storm_capacity_ceiling),
            ("sanitary_capacity_ceiling", t.sanitary_capacity_ceiling),
            ("minimum_flow_fraction", t.minimum_flow_fraction),
        ] {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(ConfigurationError::invalid(format!(
                    "{name} must lie in (0, 1]"
                )));
            }
        }
        if ThresholdName::ALL.iter().any(|n| {
            let v = t.get(*n);
            !v.is_finite() || v < 0.0
        }) {
            return Err(ConfigurationError::invalid("thresholds must be finite and non-negative"));
        }
        if !t.slope_increment_percent.is_positive() || !t.max_auto_slope_percent.is_positive() {
            return Err(ConfigurationError::invalid(
                "slope increment and maximum auto slope must be positive",
            ));
        }

        for rates in [&self.sanitary_demand, &self.water_demand] {
            let p = rates.peaking;
            if rates.per_capita_lpcd <= 0.0 || rates.per_employee_lped < 0.0 {
                return Err(ConfigurationError::invalid("demand rates must be positive"));
            }
            if p.floor < 1.0 || p.floor > p.cap || p.offset <= 0.0 || p.numerator < 0.0 {
                return Err(ConfigurationError::invalid(
                    "peaking parameters must satisfy 1 <= floor <= cap, offset > 0",
                ));
            }
        }

        let mut seen_periods = BTreeSet::new();
        for entry in &self.idf {
            if !seen_periods.insert(entry.return_period_years) {
                return Err(ConfigurationError::invalid(format!(
                    "IDF coefficients for {} listed more than once",
                    entry.return_period_years
                )));
            }
            let k = entry.coefficients();
            if !(k.a > 0.0 && k.b >= 0.0 && k.c > 0.0) {
                return Err(ConfigurationError::invalid(format!(
                    "IDF coefficients for {} must be positive",
                    entry.return_period_years
                )));
            }
        }

        Ok(())
    }
}

impl Default for StandardsTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn builtin_is_valid() {
        StandardsTable::builtin().validate().unwrap();
    }

    #[test]
    fn single_family_runoff() {
        let table = StandardsTable::builtin();
        let c = table.runoff_coefficient(LandUse::SingleFamily).unwrap();
        assert!((c.value - 0.35).abs() < 1e-12);
        assert!(c.contains(0.40));
        assert!(!c.contains(0.60));
    }

    #[test]
    fn pvc_roughness() {
        let table = StandardsTable::builtin();
        assert!((table.manning_n(Material::Pvc).unwrap() - 0.011).abs() < 1e-12);
        assert!((table.hazen_williams_c(Material::DuctileIronNew).unwrap() - 140.0).abs() < 1e-12);
    }

    #[test]
    fn missing_roughness_kind() {
        let table = StandardsTable::builtin();
        let err = table.manning_n(Material::Copper).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingRoughness { kind: "manning_n", .. }));
    }

    #[test]
    fn threshold_lookup_by_key() {
        let table = StandardsTable::builtin();
        assert!((table.threshold_by_key("storm_capacity_ceiling").unwrap() - 0.80).abs() < 1e-12);
        assert!(table.threshold_by_key("nope").is_err());
    }

    #[test]
    fn every_threshold_name_resolves() {
        let table = StandardsTable::builtin();
        for name in ThresholdName::ALL {
            assert!(table.threshold(*name).is_finite());
        }
    }

    #[test]
    fn min_grade_by_diameter() {
        let table = StandardsTable::builtin();
        assert_eq!(table.min_grade(Millimetres::new(200.0)), SlopePercent::new(0.40));
        assert_eq!(table.min_grade(Millimetres::new(1500.0)), SlopePercent::new(0.10));
        assert_eq!(table.min_grade(Millimetres::new(50.0)), SlopePercent::new(0.60));
    }

    #[test]
    fn idf_registered_periods() {
        let table = StandardsTable::builtin();
        assert_eq!(table.return_periods(), ReturnPeriod::ALL.to_vec());
        assert!(table.idf(ReturnPeriod::Y5).is_ok());
    }

    #[test]
    fn peaking_factor_bounds() {
        let p = StandardsTable::builtin().sanitary_demand().peaking;
        assert!((p.factor(0.0) - 4.0).abs() < 1e-12);
        assert!((p.factor(1.0e7) - 2.0).abs() < 1e-12);
        assert!(p.factor(5_000.0) < p.factor(1_000.0));
    }

    #[test]
    fn validate_rejects_unsorted_ladder() {
        let mut table = StandardsTable::builtin();
        table.diameters_mm.swap(0, 1);
        assert!(matches!(table.validate(), Err(ConfigurationError::InvalidTable(_))));
    }

    #[test]
    fn validate_rejects_inverted_velocity_bounds() {
        let table = StandardsTable::builtin();
        let mut t = *table.thresholds();
        t.storm_min_velocity_ms = MetresPerSecond::new(7.0);
        assert!(table.with_thresholds(t).validate().is_err());
    }

    #[test]
    fn missing_land_use_is_unknown_key() {
        let mut table = StandardsTable::builtin();
        table.land_uses.retain(|s| s.land_use != LandUse::Park);
        let err = table.runoff_coefficient(LandUse::Park).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownKey { table: "land_use", .. }));
    }

    proptest! {
        #[test]
        fn peaking_stays_within_registered_bounds(p in 0.0f64..1.0e7, extra in 0.0f64..1.0e5) {
            let table = StandardsTable::builtin();
            for rates in [table.sanitary_demand(), table.water_demand()] {
                let k = rates.peaking;
                let f = k.factor(p);
                prop_assert!(f >= k.floor && f <= k.cap);
                prop_assert!(k.factor(p + extra) <= f);
            }
        }

        #[test]
        fn min_grade_never_rises_with_diameter(i in 0usize..17, j in 0usize..17) {
            let table = StandardsTable::builtin();
            let ladder = table.diameter_ladder();
            let (small, large) = (ladder[i.min(j)], ladder[i.max(j)]);
            prop_assert!(table.min_grade(large) <= table.min_grade(small));
        }
    }
}
