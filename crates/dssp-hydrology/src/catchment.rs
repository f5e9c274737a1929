//! Catchments and time-of-concentration methods

use crate::error::HydrologyError;
use dssp_standards::{Hectares, LandUse, Metres, Minutes, SlopePercent};
use serde::{Deserialize, Serialize};

/// Empirical time-of-concentration formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TcMethod {
    /// Kirpich (1940): `tc = 0.0195 L^0.77 S^-0.385`
    #[default]
    Kirpich,
    /// FAA airport method: `tc = 3.26 (1.1 - C) L^0.5 / S%^(1/3)`
    Airport,
    /// Bransby-Williams: `tc = 14.6 L_km / (A_km2^0.1 S_m/km^0.2)`
    BransbyWilliams,
}

impl TcMethod {
    /// Evaluate the formula
    ///
    /// `length` and `slope` are validated positive by [`Catchment::new`].
    #[must_use]
    pub fn compute(
        self,
        length: Metres,
        slope: SlopePercent,
        runoff_c: f64,
        area: Hectares,
    ) -> Minutes {
        let minutes = match self {
            Self::Kirpich => {
                0.0195 * length.value().powf(0.77) * slope.as_fraction().powf(-0.385)
            }
            Self::Airport => {
                3.26 * (1.1 - runoff_c) * length.value().sqrt() / slope.value().cbrt()
            }
            Self::BransbyWilliams => {
                let slope_m_per_km = slope.value() * 10.0;
                14.6 * length.to_kilometres()
                    / (area.to_square_kilometres().powf(0.1) * slope_m_per_km.powf(0.2))
            }
        };
        Minutes::new(minutes)
    }
}

/// Where a catchment's runoff coefficient comes from
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RunoffSource {
    /// Registry default for the land use
    #[default]
    LandUseDefault,
    /// Caller-supplied value
    Explicit(f64),
}

/// Where a catchment's time of concentration comes from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TcSource {
    /// Caller-supplied value
    Explicit(Minutes),
    /// Derived from the flow path
    Computed {
        method: TcMethod,
        flow_path_length: Metres,
        average_slope: SlopePercent,
    },
}

/// Drainage area contributing to a storm pipe
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Catchment {
    id: String,
    area: Hectares,
    land_use: LandUse,
    runoff: RunoffSource,
    tc: TcSource,
}

impl Catchment {
    /// Create a catchment using the land-use runoff coefficient
    ///
    /// # Errors
    /// Returns [`HydrologyError::InvalidCatchment`] for a non-positive area,
    /// a non-positive explicit Tc, or a non-positive flow path length/slope
    pub fn new(
        id: impl Into<String>,
        area: Hectares,
        land_use: LandUse,
        tc: TcSource,
    ) -> Result<Self, HydrologyError> {
        let id = id.into();
        if !area.is_positive() {
            return Err(HydrologyError::catchment(
                &id,
                "area_ha",
                format!("must be greater than zero, got {}", area.value()),
            ));
        }
        match tc {
            TcSource::Explicit(minutes) if !minutes.is_positive() => {
                return Err(HydrologyError::catchment(
                    &id,
                    "tc_minutes",
                    format!("must be greater than zero, got {}", minutes.value()),
                ));
            }
            TcSource::Computed {
                flow_path_length,
                average_slope,
                ..
            } => {
                if !flow_path_length.is_positive() {
                    return Err(HydrologyError::catchment(
                        &id,
                        "flow_path_length_m",
                        "must be greater than zero to compute time of concentration",
                    ));
                }
                if !average_slope.is_positive() {
                    return Err(HydrologyError::catchment(
                        &id,
                        "average_slope_percent",
                        "must be greater than zero to compute time of concentration",
                    ));
                }
            }
            TcSource::Explicit(_) => {}
        }

        Ok(Self {
            id,
            area,
            land_use,
            runoff: RunoffSource::LandUseDefault,
            tc,
        })
    }

    /// Override the land-use runoff coefficient
    ///
    /// # Errors
    /// Returns [`HydrologyError::InvalidCatchment`] if `c` is outside `(0, 1]`
    pub fn with_runoff_coefficient(mut self, c: f64) -> Result<Self, HydrologyError> {
        if !(c.is_finite() && c > 0.0 && c <= 1.0) {
            return Err(HydrologyError::catchment(
                &self.id,
                "runoff_c",
                format!("must lie in (0, 1], got {c}"),
            ));
        }
        self.runoff = RunoffSource::Explicit(c);
        Ok(self)
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn area(&self) -> Hectares {
        self.area
    }

    #[inline]
    #[must_use]
    pub fn land_use(&self) -> LandUse {
        self.land_use
    }

    #[inline]
    #[must_use]
    pub fn runoff(&self) -> RunoffSource {
        self.runoff
    }

    #[inline]
    #[must_use]
    pub fn tc_source(&self) -> TcSource {
        self.tc
    }
}
