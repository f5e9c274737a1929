//! DSSP Standards Registry
//!
//! Immutable municipal design standards and the typed vocabulary shared by
//! every servicing-design crate.
//!
//! # Core Concepts
//!
//! - [`StandardsTable`]: versioned registry of roughness, runoff, thresholds,
//!   IDF coefficients and the standard diameter ladder
//! - [`LandUse`], [`Material`], [`ReturnPeriod`], [`ThresholdName`]: closed
//!   key enumerations validated at the boundary
//! - Unit newtypes ([`Hectares`], [`LitresPerSecond`], [`SlopePercent`], ...)
//!
//! # Example
//!
//! ```rust
//! use dssp_standards::{LandUse, Material, StandardsTable};
//!
//! let table = StandardsTable::builtin();
//! let c = table.runoff_coefficient(LandUse::SingleFamily).unwrap();
//! assert!((c.value - 0.35).abs() < 1e-9);
//! assert!(table.manning_n(Material::Pvc).is_ok());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod catalog;
mod config;
mod error;
mod global;
mod table;
pub mod units;

// Re-exports
pub use catalog::{LandUse, Material, ReturnPeriod, ThresholdName};
pub use config::ConfigFormat;
pub use error::{ConfigurationError, UnsupportedReturnPeriod};
pub use global::{global, install, is_installed};
pub use table::{
    DemandRates, IdfCoefficients, IdfEntry, LandUseStandard, MaterialRoughness, MinimumGrade,
    PeakingParameters, RunoffCoefficient, StandardsTable, Thresholds, BUILTIN_VERSION,
};
pub use units::{
    Hectares, Kilopascals, LitresPerSecond, Metres, MetresPerSecond, MillimetresPerHour,
    Millimetres, Minutes, SlopePercent,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for registry lookups
    pub use crate::{
        ConfigurationError, Hectares, Kilopascals, LandUse, LitresPerSecond, Material, Metres,
        MetresPerSecond, Millimetres, MillimetresPerHour, Minutes, ReturnPeriod, SlopePercent,
        StandardsTable, ThresholdName,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
