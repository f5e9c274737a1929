//! Unit-tagged scalar types
//!
//! Every quantity crossing a component boundary carries its unit in the
//! type. Conversions live on the types so call sites never multiply by
//! bare constants.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

/// Unit weight of water, kPa per metre of head
pub const WATER_UNIT_WEIGHT_KPA_PER_M: f64 = 9.81;

macro_rules! unit {
    ($(#[$meta:meta])* $name:ident, $symbol:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Wrap a raw value
            #[inline]
            #[must_use]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Raw value in this unit
            #[inline]
            #[must_use]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Finite and strictly greater than zero
            #[inline]
            #[must_use]
            pub fn is_positive(self) -> bool {
                self.0.is_finite() && self.0 > 0.0
            }

            /// Larger of two values
            #[inline]
            #[must_use]
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                match f.precision() {
                    Some(p) => write!(f, "{:.*} {}", p, self.0, $symbol),
                    None => write!(f, "{} {}", self.0, $symbol),
                }
            }
        }

        impl Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;

            fn mul(self, rhs: f64) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|v| v.0).sum())
            }
        }
    };
}

unit!(
    /// Area in hectares
    Hectares,
    "ha"
);
unit!(
    /// Length in millimetres (pipe diameters)
    Millimetres,
    "mm"
);
unit!(
    /// Length in metres
    Metres,
    "m"
);
unit!(
    /// Flow rate in litres per second
    LitresPerSecond,
    "L/s"
);
unit!(
    /// Velocity in metres per second
    MetresPerSecond,
    "m/s"
);
unit!(
    /// Pressure in kilopascals
    Kilopascals,
    "kPa"
);
unit!(
    /// Grade as a percentage (1 % = 0.01 m/m)
    SlopePercent,
    "%"
);
unit!(
    /// Duration in minutes
    Minutes,
    "min"
);
unit!(
    /// Rainfall intensity in millimetres per hour
    MillimetresPerHour,
    "mm/h"
);

impl Hectares {
    /// Area in square metres
    #[inline]
    #[must_use]
    pub fn to_square_metres(self) -> f64 {
        self.0 * 10_000.0
    }

    /// Area in square kilometres
    #[inline]
    #[must_use]
    pub fn to_square_kilometres(self) -> f64 {
        self.0 / 100.0
    }
}

impl Millimetres {
    /// Same length in metres
    #[inline]
    #[must_use]
    pub fn to_metres(self) -> Metres {
        Metres(self.0 / 1000.0)
    }
}

impl Metres {
    /// Same length in millimetres
    #[inline]
    #[must_use]
    pub fn to_millimetres(self) -> Millimetres {
        Millimetres(self.0 * 1000.0)
    }

    /// Same length in kilometres
    #[inline]
    #[must_use]
    pub fn to_kilometres(self) -> f64 {
        self.0 / 1000.0
    }
}

impl LitresPerSecond {
    /// Flow in cubic metres per second
    #[inline]
    #[must_use]
    pub fn to_cubic_metres_per_second(self) -> f64 {
        self.0 / 1000.0
    }

    /// Build from cubic metres per second
    #[inline]
    #[must_use]
    pub fn from_cubic_metres_per_second(q: f64) -> Self {
        Self(q * 1000.0)
    }

    /// Build from litres per day
    #[inline]
    #[must_use]
    pub fn from_litres_per_day(litres: f64) -> Self {
        Self(litres / 86_400.0)
    }
}

impl Kilopascals {
    /// Pressure exerted by a column of water
    #[inline]
    #[must_use]
    pub fn from_head(head: Metres) -> Self {
        Self(head.0 * WATER_UNIT_WEIGHT_KPA_PER_M)
    }

    /// Equivalent water head
    #[inline]
    #[must_use]
    pub fn to_head(self) -> Metres {
        Metres(self.0 / WATER_UNIT_WEIGHT_KPA_PER_M)
    }
}

impl SlopePercent {
    /// Grade as a dimensionless fraction (m/m)
    #[inline]
    #[must_use]
    pub fn as_fraction(self) -> f64 {
        self.0 / 100.0
    }

    /// Build from a dimensionless fraction (m/m)
    #[inline]
    #[must_use]
    pub fn from_fraction(fraction: f64) -> Self {
        Self(fraction * 100.0)
    }

    /// Round up to the next multiple of `increment`
    ///
    /// A tiny relative tolerance keeps values that are already on the grid
    /// from being pushed one increment higher by float noise.
    #[must_use]
    pub fn round_up_to(self, increment: SlopePercent) -> Self {
        if !increment.is_positive() {
            return self;
        }
        let steps = self.0 / increment.0;
        let snapped = if (steps - steps.round()).abs() < 1e-9 {
            steps.round()
        } else {
            steps.ceil()
        };
        Self(snapped * increment.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn slope_percent_fraction_conversion() {
        let s = SlopePercent::new(2.0);
        assert!((s.as_fraction() - 0.02).abs() < 1e-12);
        assert!((SlopePercent::from_fraction(0.005).value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn slope_round_up() {
        let inc = SlopePercent::new(0.01);
        assert!((SlopePercent::new(0.1234).round_up_to(inc).value() - 0.13).abs() < 1e-9);
        assert!((SlopePercent::new(0.22).round_up_to(inc).value() - 0.22).abs() < 1e-9);
    }

    #[test]
    fn head_to_pressure() {
        let p = Kilopascals::from_head(Metres::new(10.0));
        assert!((p.value() - 98.1).abs() < 1e-9);
        assert!((p.to_head().value() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn flow_conversions() {
        let q = LitresPerSecond::from_cubic_metres_per_second(0.25);
        assert!((q.value() - 250.0).abs() < 1e-12);
        assert!((LitresPerSecond::from_litres_per_day(86_400.0).value() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unit_sum_and_display() {
        let total: LitresPerSecond = [1.5, 2.5].into_iter().map(LitresPerSecond::new).sum();
        assert_eq!(total, LitresPerSecond::new(4.0));
        assert_eq!(format!("{:.1}", total), "4.0 L/s");
    }

    #[test]
    fn positivity() {
        assert!(Hectares::new(0.1).is_positive());
        assert!(!Hectares::new(0.0).is_positive());
        assert!(!Hectares::new(f64::NAN).is_positive());
    }

    proptest! {
        #[test]
        fn round_up_lands_on_the_next_increment(s in 0.0f64..20.0, t in 0.0f64..20.0) {
            let inc = SlopePercent::new(0.01);
            let r = SlopePercent::new(s).round_up_to(inc).value();
            prop_assert!(r >= s - 1e-9);
            prop_assert!(r < s + 0.01 + 1e-9);

            let (lo, hi) = if s <= t { (s, t) } else { (t, s) };
            let lo = SlopePercent::new(lo).round_up_to(inc);
            let hi = SlopePercent::new(hi).round_up_to(inc);
            prop_assert!(lo.value() <= hi.value() + 1e-12);
        }
    }
}
