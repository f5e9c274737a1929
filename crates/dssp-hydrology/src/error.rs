//! Error types for hydrology estimators

use dssp_standards::{ConfigurationError, UnsupportedReturnPeriod};

/// Hydrology input or configuration error
#[derive(Debug, thiserror::Error)]
pub enum HydrologyError {
    /// Return period without registered IDF coefficients
    #[error(transparent)]
    UnsupportedReturnPeriod(#[from] UnsupportedReturnPeriod),

    /// Catchment failed validation
    #[error("invalid catchment '{id}': {field} {reason}")]
    InvalidCatchment {
        /// Catchment identifier
        id: String,
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Tributary load failed validation
    #[error("invalid load '{id}': {field} {reason}")]
    InvalidLoadInput {
        /// Load identifier
        id: String,
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Any other argument failed validation
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

impl HydrologyError {
    /// Field that caused the failure, if the error is field-specific
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedReturnPeriod(_) => Some("return_period_years"),
            Self::InvalidCatchment { field, .. }
            | Self::InvalidLoadInput { field, .. }
            | Self::InvalidInput { field, .. } => Some(field),
            Self::Configuration(_) => None,
        }
    }

    pub(crate) fn catchment(id: &str, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidCatchment {
            id: id.to_string(),
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn load(id: &str, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidLoadInput {
            id: id.to_string(),
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_accessor() {
        let err = HydrologyError::catchment("C1", "area_ha", "must be greater than zero");
        assert_eq!(err.field(), Some("area_ha"));
        assert!(err.to_string().contains("C1"));

        let err: HydrologyError = UnsupportedReturnPeriod { years: 3 }.into();
        assert_eq!(err.field(), Some("return_period_years"));
    }
}
