//! Process-wide standards registry
//!
//! The table is installed at most once during start-up and read without
//! synchronization afterwards. If nothing is installed, the first read
//! installs [`StandardsTable::builtin`].

use crate::error::ConfigurationError;
use crate::table::StandardsTable;
use once_cell::sync::OnceCell;
use std::sync::Arc;

static GLOBAL: OnceCell<Arc<StandardsTable>> = OnceCell::new();

/// Install the process-wide table
///
/// # Errors
/// Returns [`ConfigurationError::InvalidTable`] if the table fails
/// validation, or [`ConfigurationError::AlreadyInstalled`] if a table was
/// already installed or read
pub fn install(table: StandardsTable) -> Result<Arc<StandardsTable>, ConfigurationError> {
    table.validate()?;
    let version = table.version().to_string();
    let table = Arc::new(table);
    GLOBAL
        .set(Arc::clone(&table))
        .map_err(|_| ConfigurationError::AlreadyInstalled)?;
    tracing::info!(version = %version, "Installed standards table");
    Ok(table)
}

/// Process-wide table
#[must_use]
pub fn global() -> Arc<StandardsTable> {
    Arc::clone(GLOBAL.get_or_init(|| Arc::new(StandardsTable::builtin())))
}

/// Whether a table has been installed or read
#[inline]
#[must_use]
pub fn is_installed() -> bool {
    GLOBAL.get().is_some()
}
