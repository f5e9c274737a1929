//! Closed key enumerations for registry lookups
//!
//! Land uses, pipe materials, return periods and threshold names are
//! validated once at the boundary (`FromStr` / serde) so the engines can
//! match exhaustively.

use crate::error::{ConfigurationError, UnsupportedReturnPeriod};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

macro_rules! keyed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $table:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $key:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $key)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [Self] = &[$( Self::$variant ),+];

            /// Registry key
            #[inline]
            #[must_use]
            pub const fn key(self) -> &'static str {
                match self {
                    $( Self::$variant => $key ),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }

        impl FromStr for $name {
            type Err = ConfigurationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
                match normalized.as_str() {
                    $( $key => Ok(Self::$variant), )+
                    _ => Err(ConfigurationError::unknown_key($table, s)),
                }
            }
        }
    };
}

keyed_enum! {
    /// Land-use category of a catchment or tributary area
    LandUse, "land_use" {
        /// Detached single-family residential
        SingleFamily => "single_family",
        /// Townhouse / rowhouse residential
        Townhouse => "townhouse",
        /// Low- or high-rise apartment
        Apartment => "apartment",
        /// Commercial / retail
        Commercial => "commercial",
        /// Light or heavy industrial
        Industrial => "industrial",
        /// Schools, hospitals, civic buildings
        Institutional => "institutional",
        /// Parks and open space
        Park => "park",
        /// Paved roadway and parking
        Roadway => "roadway",
    }
}

keyed_enum! {
    /// Pipe material
    Material, "material" {
        /// Polyvinyl chloride
        Pvc => "pvc",
        /// High-density polyethylene
        Hdpe => "hdpe",
        /// Reinforced concrete
        Concrete => "concrete",
        /// Vitrified clay
        VitrifiedClay => "vitrified_clay",
        /// Cement-lined ductile iron, new
        DuctileIronNew => "ductile_iron_new",
        /// Ductile iron, aged
        DuctileIronOld => "ductile_iron_old",
        /// Cast iron
        CastIron => "cast_iron",
        /// Corrugated steel
        CorrugatedSteel => "corrugated_steel",
        /// Copper (small services)
        Copper => "copper",
    }
}

keyed_enum! {
    /// Named numeric design threshold
    ThresholdName, "threshold" {
        /// Minimum storm sewer velocity (m/s)
        StormMinVelocity => "storm_min_velocity_ms",
        /// Maximum storm sewer velocity (m/s)
        StormMaxVelocity => "storm_max_velocity_ms",
        /// Storm capacity utilization ceiling (fraction)
        StormCapacityCeiling => "storm_capacity_ceiling",
        /// Minimum sanitary design velocity (m/s)
        SanitaryMinVelocity => "sanitary_min_velocity_ms",
        /// Maximum sanitary velocity (m/s)
        SanitaryMaxVelocity => "sanitary_max_velocity_ms",
        /// Sanitary capacity utilization ceiling (fraction)
        SanitaryCapacityCeiling => "sanitary_capacity_ceiling",
        /// Self-cleansing velocity at minimum flow (m/s)
        SelfCleansingVelocity => "self_cleansing_velocity_ms",
        /// Minimum-flow fraction of sanitary design flow
        MinimumFlowFraction => "minimum_flow_fraction",
        /// Minimum residual pressure, normal service (kPa)
        WaterMinNormalPressure => "water_min_normal_pressure_kpa",
        /// Minimum residual pressure under fire flow (kPa)
        WaterMinFirePressure => "water_min_fire_pressure_kpa",
        /// Maximum water main velocity (m/s)
        WaterMaxVelocity => "water_max_velocity_ms",
        /// Minimum time of concentration (min)
        MinTimeOfConcentration => "min_time_of_concentration_min",
        /// Sanitary infiltration allowance (L/s per ha)
        InfiltrationRate => "infiltration_ls_per_ha",
        /// Slope rounding increment (%)
        SlopeIncrement => "slope_increment_percent",
        /// Largest slope the engine will auto-select (%)
        MaxAutoSlope => "max_auto_slope_percent",
        /// Minimum storm main diameter (mm)
        StormMinDiameter => "storm_min_diameter_mm",
        /// Minimum sanitary main diameter (mm)
        SanitaryMinDiameter => "sanitary_min_diameter_mm",
        /// Minimum water main diameter (mm)
        WaterMinDiameter => "water_min_diameter_mm",
    }
}

/// Design storm recurrence interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ReturnPeriod {
    /// 2-year storm
    Y2,
    /// 5-year storm
    Y5,
    /// 10-year storm
    Y10,
    /// 25-year storm
    Y25,
    /// 50-year storm
    Y50,
    /// 100-year storm
    Y100,
}

impl ReturnPeriod {
    /// Every registered return period, ascending
    pub const ALL: &'static [Self] = &[
        Self::Y2,
        Self::Y5,
        Self::Y10,
        Self::Y25,
        Self::Y50,
        Self::Y100,
    ];

    /// Recurrence interval in years
    #[inline]
    #[must_use]
    pub const fn years(self) -> u32 {
        match self {
            Self::Y2 => 2,
            Self::Y5 => 5,
            Self::Y10 => 10,
            Self::Y25 => 25,
            Self::Y50 => 50,
            Self::Y100 => 100,
        }
    }

    /// Parse a recurrence interval
    ///
    /// # Errors
    /// Returns [`UnsupportedReturnPeriod`] for anything outside
    /// {2, 5, 10, 25, 50, 100}
    pub fn from_years(years: u32) -> Result<Self, UnsupportedReturnPeriod> {
        match years {
            2 => Ok(Self::Y2),
            5 => Ok(Self::Y5),
            10 => Ok(Self::Y10),
            25 => Ok(Self::Y25),
            50 => Ok(Self::Y50),
            100 => Ok(Self::Y100),
            _ => Err(UnsupportedReturnPeriod { years }),
        }
    }
}

impl TryFrom<u32> for ReturnPeriod {
    type Error = UnsupportedReturnPeriod;

    fn try_from(years: u32) -> Result<Self, Self::Error> {
        Self::from_years(years)
    }
}

impl From<ReturnPeriod> for u32 {
    fn from(period: ReturnPeriod) -> Self {
        period.years()
    }
}

impl Display for ReturnPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-year", self.years())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn land_use_from_str() {
        assert_eq!("single_family".parse::<LandUse>().unwrap(), LandUse::SingleFamily);
        assert_eq!("Single-Family".parse::<LandUse>().unwrap(), LandUse::SingleFamily);
        let err = "farm".parse::<LandUse>().unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownKey { table: "land_use", .. }));
    }

    #[test]
    fn material_keys_roundtrip() {
        for material in Material::ALL {
            assert_eq!(material.key().parse::<Material>().unwrap(), *material);
        }
    }

    #[test]
    fn material_serde_snake_case() {
        let json = serde_json::to_string(&Material::DuctileIronNew).unwrap();
        assert_eq!(json, "\"ductile_iron_new\"");
    }

    #[test]
    fn serde_names_are_registry_keys() {
        for name in ThresholdName::ALL {
            let json = serde_json::to_string(name).unwrap();
            assert_eq!(json, format!("\"{}\"", name.key()));
            let back: ThresholdName = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *name);
        }
        for land_use in LandUse::ALL {
            assert_eq!(serde_json::to_string(land_use).unwrap(), format!("\"{land_use}\""));
        }
    }

    #[test]
    fn threshold_unknown_key() {
        assert!("storm_min_velocity_ms".parse::<ThresholdName>().is_ok());
        assert!("warp_speed".parse::<ThresholdName>().is_err());
    }

    #[test]
    fn return_period_parsing() {
        assert_eq!(ReturnPeriod::from_years(25).unwrap(), ReturnPeriod::Y25);
        assert_eq!(ReturnPeriod::from_years(3), Err(UnsupportedReturnPeriod { years: 3 }));
    }

    #[test]
    fn return_period_serde_rejects_unregistered() {
        let ok: ReturnPeriod = serde_json::from_str("100").unwrap();
        assert_eq!(ok, ReturnPeriod::Y100);
        assert!(serde_json::from_str::<ReturnPeriod>("20").is_err());
        assert_eq!(serde_json::to_string(&ReturnPeriod::Y5).unwrap(), "5");
    }
}
