//! DSSP Core - Development Servicing Design Engine
//!
//! The orchestration layer that:
//! - Validates design requests into typed domain values
//! - Estimates design flows (Rational Method, sanitary and water demand)
//! - Sizes pipes against the standard diameter ladder
//! - Reports adequacy per criterion with explanatory notes
//!
//! # Example
//!
//! ```rust
//! use dssp_core::prelude::*;
//!
//! let orchestrator = DesignOrchestrator::new(Arc::new(StandardsTable::builtin()));
//! let request = StormPipeRequest {
//!     pipe_id: "ST-1".into(),
//!     catchments: vec![CatchmentInput {
//!         id: None,
//!         area_ha: Hectares::new(2.5),
//!         land_use: LandUse::SingleFamily,
//!         runoff_c: None,
//!         flow_path_length_m: Some(Metres::new(200.0)),
//!         average_slope_percent: Some(SlopePercent::new(2.0)),
//!         tc_method: TcMethod::Kirpich,
//!         tc_minutes: None,
//!     }],
//!     slope_percent: None,
//!     return_period_years: 5,
//!     material: Material::Pvc,
//!     min_diameter_mm: Some(Millimetres::new(300.0)),
//! };
//!
//! let result = orchestrator.design_storm_pipe(&request).unwrap();
//! assert!(result.diameter_mm >= Millimetres::new(300.0));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod orchestrator;
pub mod request;
pub mod response;

// Re-exports for convenience
pub use error::DesignError;
pub use orchestrator::DesignOrchestrator;
pub use request::{
    CatchmentInput, DesignRequest, LoadInput, SanitaryPipeRequest, StormPipeRequest,
    WaterServiceRequest,
};
pub use response::{DesignResponse, PipeDesignResult, SanitaryPipeResult, WaterServiceResult};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running designs
    pub use crate::{
        CatchmentInput, DesignError, DesignOrchestrator, DesignRequest, DesignResponse, LoadInput,
        PipeDesignResult, SanitaryPipeRequest, SanitaryPipeResult, StormPipeRequest,
        WaterServiceRequest, WaterServiceResult,
    };
    pub use dssp_hydraulics::SlopeSelection;
    pub use dssp_hydrology::{FireFlowDemand, TcMethod};
    pub use dssp_standards::prelude::*;
    pub use std::sync::Arc;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
