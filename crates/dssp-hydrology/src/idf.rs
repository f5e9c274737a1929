//! Rainfall intensity-duration-frequency model
//!
//! `i = a / (t + b)^c` with `t` in minutes and `i` in mm/h, one
//! coefficient triple per registered return period.

use crate::error::HydrologyError;
use dssp_standards::{
    IdfCoefficients, MillimetresPerHour, Minutes, ReturnPeriod, StandardsTable,
    UnsupportedReturnPeriod,
};
use serde::Serialize;

/// Durations used for reference tabulation (minutes)
pub const DURATION_LADDER: [Minutes; 9] = [
    Minutes::new(5.0),
    Minutes::new(10.0),
    Minutes::new(15.0),
    Minutes::new(30.0),
    Minutes::new(60.0),
    Minutes::new(120.0),
    Minutes::new(360.0),
    Minutes::new(720.0),
    Minutes::new(1440.0),
];

/// IDF curve for a single return period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdfCurve {
    period: ReturnPeriod,
    coefficients: IdfCoefficients,
}

impl IdfCurve {
    /// Curve registered for `period`
    ///
    /// # Errors
    /// Returns [`UnsupportedReturnPeriod`] if the table has no coefficients
    /// for the period
    pub fn for_period(
        table: &StandardsTable,
        period: ReturnPeriod,
    ) -> Result<Self, UnsupportedReturnPeriod> {
        Ok(Self {
            period,
            coefficients: table.idf(period)?,
        })
    }

    /// Return period of this curve
    #[inline]
    #[must_use]
    pub fn period(&self) -> ReturnPeriod {
        self.period
    }

    /// Intensity for a storm of the given duration
    ///
    /// Callers validate `duration > 0`.
    #[inline]
    #[must_use]
    pub fn intensity(&self, duration: Minutes) -> MillimetresPerHour {
        let IdfCoefficients { a, b, c } = self.coefficients;
        MillimetresPerHour::new(a / (duration.value() + b).powf(c))
    }
}

/// Rainfall intensity for a return period and duration
///
/// # Errors
/// - [`HydrologyError::UnsupportedReturnPeriod`] for an unregistered period
/// - [`HydrologyError::InvalidInput`] for a non-positive duration
pub fn rainfall_intensity(
    table: &StandardsTable,
    period: ReturnPeriod,
    duration: Minutes,
) -> Result<MillimetresPerHour, HydrologyError> {
    if !duration.is_positive() {
        return Err(HydrologyError::input(
            "duration_min",
            format!("must be greater than zero, got {}", duration.value()),
        ));
    }
    Ok(IdfCurve::for_period(table, period)?.intensity(duration))
}

/// One return period's row of an intensity table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityRow {
    /// Return period (years)
    pub return_period_years: ReturnPeriod,
    /// Intensity per duration, aligned with [`IntensityTable::durations_min`]
    pub intensities_mm_h: Vec<MillimetresPerHour>,
}

/// Intensities for a cross-product of return periods and durations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityTable {
    /// Column durations
    pub durations_min: Vec<Minutes>,
    /// One row per return period
    pub rows: Vec<IntensityRow>,
}

impl IntensityTable {
    /// Intensity at a row/column, if present
    #[must_use]
    pub fn get(&self, period: ReturnPeriod, duration: Minutes) -> Option<MillimetresPerHour> {
        let col = self.durations_min.iter().position(|d| *d == duration)?;
        self.rows
            .iter()
            .find(|r| r.return_period_years == period)
            .and_then(|r| r.intensities_mm_h.get(col).copied())
    }
}

/// Tabulate intensities for display
///
/// # Errors
/// Same as [`rainfall_intensity`] for any period or duration in the input
pub fn tabulate(
    table: &StandardsTable,
    periods: &[ReturnPeriod],
    durations: &[Minutes],
) -> Result<IntensityTable, HydrologyError> {
    if let Some(bad) = durations.iter().find(|d| !d.is_positive()) {
        return Err(HydrologyError::input(
            "duration_min",
            format!("must be greater than zero, got {}", bad.value()),
        ));
    }

    let rows = periods
        .iter()
        .map(|&period| {
            let curve = IdfCurve::for_period(table, period)?;
            Ok(IntensityRow {
                return_period_years: period,
                intensities_mm_h: durations.iter().map(|&d| curve.intensity(d)).collect(),
            })
        })
        .collect::<Result<Vec<_>, HydrologyError>>()?;

    Ok(IntensityTable {
        durations_min: durations.to_vec(),
        rows,
    })
}

/// Tabulate every registered return period over [`DURATION_LADDER`]
///
/// # Errors
/// Propagates [`tabulate`] errors
pub fn tabulate_standard(table: &StandardsTable) -> Result<IntensityTable, HydrologyError> {
    tabulate(table, &table.return_periods(), &DURATION_LADDER)
}
