//! DSSP Hydrology
//!
//! Design-flow estimation for storm, sanitary and water services.
//!
//! # Core Concepts
//!
//! - [`IdfCurve`]: rainfall intensity `i = a / (t + b)^c` per return period
//! - [`RationalEstimator`]: Rational Method peak flow for a group of
//!   [`Catchment`]s at the longest time of concentration
//! - [`SanitaryDemandEstimator`]: peaked sanitary flow plus infiltration
//! - [`WaterDemandEstimator`]: peak-hour domestic demand plus fire flow
//!
//! All estimators borrow a [`StandardsTable`](dssp_standards::StandardsTable)
//! and are pure functions of their inputs.
//!
//! # Example
//!
//! ```rust
//! use dssp_hydrology::prelude::*;
//!
//! let table = StandardsTable::builtin();
//! let catchment = Catchment::new(
//!     "C1",
//!     Hectares::new(2.5),
//!     LandUse::SingleFamily,
//!     TcSource::Explicit(Minutes::new(15.0)),
//! )
//! .unwrap();
//!
//! let estimate = RationalEstimator::new(&table)
//!     .estimate(&[catchment], ReturnPeriod::Y5)
//!     .unwrap();
//! assert!(estimate.design_flow.is_positive());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod catchment;
mod error;
pub mod idf;
mod load;
mod rational;
mod sanitary;
mod water;

// Re-exports
pub use catchment::{Catchment, RunoffSource, TcMethod, TcSource};
pub use error::HydrologyError;
pub use idf::{
    rainfall_intensity, tabulate, tabulate_standard, IdfCurve, IntensityRow, IntensityTable,
};
pub use load::{
    load_demand, tributary_demand, LoadBasis, LoadDemand, Residents, SanitaryLoad, TributaryDemand,
    TributaryLoad, WaterLoad,
};
pub use rational::{
    peak_flow, CatchmentContribution, RationalEstimate, RationalEstimator, RATIONAL_CONVERSION,
};
pub use sanitary::{SanitaryDemandEstimator, SanitaryEstimate};
pub use water::{FireFlowDemand, WaterDemandEstimate, WaterDemandEstimator};

/// Prelude module for common imports
pub mod prelude {
    //! Estimators and the registry types they take
    pub use crate::{
        Catchment, FireFlowDemand, HydrologyError, RationalEstimator, SanitaryDemandEstimator,
        SanitaryLoad, TcMethod, TcSource, WaterDemandEstimator, WaterLoad,
    };
    pub use dssp_standards::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
