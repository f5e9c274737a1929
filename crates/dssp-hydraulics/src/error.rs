//! Error types for the sizing engines
//!
//! Only caller errors live here. A design that no standard diameter can
//! satisfy is a normal result with false adequacy flags.

use dssp_standards::ConfigurationError;

/// Sizing input or configuration error
#[derive(Debug, thiserror::Error)]
pub enum HydraulicsError {
    /// Argument failed validation
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Registry lookup failed
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl HydraulicsError {
    /// Field that caused the failure, if any
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidInput { field, .. } => Some(field),
            Self::Configuration(_) => None,
        }
    }

    pub(crate) fn input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Reject values that are non-finite or not strictly positive
    pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self::input(field, format!("must be greater than zero, got {value}")))
        }
    }
}
