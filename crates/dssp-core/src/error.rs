//! Error types for DSSP Core
//!
//! [`DesignError`] is a rejected request. Infeasible designs are never
//! errors; they come back as results with false adequacy flags.

use dssp_hydraulics::HydraulicsError;
use dssp_hydrology::HydrologyError;
use dssp_standards::{ConfigurationError, UnsupportedReturnPeriod};

/// Main design error type
#[derive(Debug, thiserror::Error)]
pub enum DesignError {
    /// Request field missing or inconsistent before any estimator runs
    #[error("invalid {field}: {reason}")]
    InvalidRequest {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Return period without IDF coefficients
    #[error(transparent)]
    UnsupportedReturnPeriod(#[from] UnsupportedReturnPeriod),

    /// Flow estimation rejected its input
    #[error(transparent)]
    Hydrology(#[from] HydrologyError),

    /// Sizing engine rejected its input
    #[error(transparent)]
    Hydraulics(#[from] HydraulicsError),

    /// Standards registry error
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl DesignError {
    /// Request field that caused the failure, if any
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidRequest { field, .. } => Some(field),
            Self::UnsupportedReturnPeriod(_) => Some("return_period_years"),
            Self::Hydrology(e) => e.field(),
            Self::Hydraulics(e) => e.field(),
            Self::Configuration(_) => None,
        }
    }

    /// Check if the error comes from the standards registry rather than
    /// the request
    #[inline]
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_)
                | Self::Hydrology(HydrologyError::Configuration(_))
                | Self::Hydraulics(HydraulicsError::Configuration(_))
        )
    }

    pub(crate) fn request(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field,
            reason: reason.into(),
        }
    }
}
