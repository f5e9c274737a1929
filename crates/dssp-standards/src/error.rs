//! Error types for the standards registry
//!
//! Covers:
//! - Unknown registry keys (land use, material, threshold names)
//! - Materials without the requested roughness coefficient
//! - Malformed or inconsistent standards tables
//! - Loading failures (I/O, parse)

use std::path::PathBuf;

/// Registry configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// Key not present in a registry table
    #[error("unknown {table} key: '{key}'")]
    UnknownKey {
        /// Table being searched (`land_use`, `material`, `threshold`, ...)
        table: &'static str,
        /// Offending key
        key: String,
    },

    /// Material has no coefficient of the requested kind
    #[error("material '{material}' has no registered {kind} coefficient")]
    MissingRoughness {
        /// Material key
        material: String,
        /// `manning_n` or `hazen_williams_c`
        kind: &'static str,
    },

    /// Table failed consistency validation
    #[error("invalid standards table: {0}")]
    InvalidTable(String),

    /// Table file could not be read
    #[error("cannot read standards file {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Table file could not be parsed
    #[error("cannot parse {format} standards: {message}")]
    Parse {
        /// Format name
        format: &'static str,
        /// Parser message
        message: String,
    },

    /// The process-wide table was already installed
    #[error("standards table already installed for this process")]
    AlreadyInstalled,
}

impl ConfigurationError {
    /// Create an unknown-key error
    #[inline]
    pub fn unknown_key(table: &'static str, key: impl Into<String>) -> Self {
        Self::UnknownKey {
            table,
            key: key.into(),
        }
    }

    /// Create an invalid-table error
    #[inline]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidTable(reason.into())
    }
}

/// Return period not registered for rainfall intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unsupported return period: {years} years (supported: 2, 5, 10, 25, 50, 100)")]
pub struct UnsupportedReturnPeriod {
    /// Requested recurrence interval
    pub years: u32,
}
