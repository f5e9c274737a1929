//! DSSP Hydraulics
//!
//! Pipe sizing over the standard diameter ladder.
//!
//! # Core Concepts
//!
//! - [`GravitySizingEngine`]: Manning full-flow capacity and circular
//!   part-full elements, one engine for storm and sanitary ([`GravityMode`])
//! - [`PressurizedSizingEngine`]: Hazen-Williams friction loss and residual
//!   pressure for water services
//! - Infeasible designs are results, not errors: the largest standard
//!   diameter is reported with false adequacy flags and explanatory notes
//!
//! # Example
//!
//! ```rust
//! use dssp_hydraulics::prelude::*;
//!
//! let table = StandardsTable::builtin();
//! let input = GravityDesignInput {
//!     design_flow: LitresPerSecond::new(30.0),
//!     slope: None,
//!     material: Material::Pvc,
//!     min_diameter: Millimetres::new(300.0),
//!     mode: GravityMode::Storm,
//! };
//! let sizing = GravitySizingEngine::new(&table).size(&input).unwrap();
//! assert!(sizing.diameter >= Millimetres::new(300.0));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
pub mod geometry;
mod gravity;
mod pressurized;

// Re-exports
pub use error::HydraulicsError;
pub use geometry::{CircularSection, FlowState, PartialFlow};
pub use gravity::{
    Candidate, GravityDesignInput, GravityMode, GravitySizing, GravitySizingEngine,
    MinimumFlowCheck, SlopeSelection,
};
pub use pressurized::{
    bore_velocity, hazen_williams_head_loss, FireFlowCheck, PressurizedDesignInput,
    PressurizedSizing, PressurizedSizingEngine,
};

/// Prelude module for common imports
pub mod prelude {
    //! Sizing engines and the registry types they take
    pub use crate::{
        GravityDesignInput, GravityMode, GravitySizing, GravitySizingEngine, HydraulicsError,
        PressurizedDesignInput, PressurizedSizing, PressurizedSizingEngine, SlopeSelection,
    };
    pub use dssp_standards::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
