//! Loading standards tables from configuration files
//!
//! Supports TOML, YAML and JSON. Every loaded table is validated before it
//! is handed back.

use crate::error::ConfigurationError;
use crate::table::StandardsTable;
use std::path::Path;

/// Serialized table format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML document
    Toml,
    /// YAML document
    Yaml,
    /// JSON document
    Json,
}

impl ConfigFormat {
    /// Pick a format from a file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Format name for diagnostics
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
            Self::Json => "JSON",
        }
    }
}

impl StandardsTable {
    /// Parse and validate a table from text
    ///
    /// # Errors
    /// Returns [`ConfigurationError::Parse`] if the text does not match the
    /// schema, or [`ConfigurationError::InvalidTable`] if it is inconsistent
    pub fn from_str_with(text: &str, format: ConfigFormat) -> Result<Self, ConfigurationError> {
        let parse_err = |message: String| ConfigurationError::Parse {
            format: format.name(),
            message,
        };

        let table: Self = match format {
            ConfigFormat::Toml => toml::from_str(text).map_err(|e| parse_err(e.to_string()))?,
            ConfigFormat::Yaml => {
                serde_yaml::from_str(text).map_err(|e| parse_err(e.to_string()))?
            }
            ConfigFormat::Json => {
                serde_json::from_str(text).map_err(|e| parse_err(e.to_string()))?
            }
        };

        table.validate()?;
        tracing::debug!(
            version = table.version(),
            format = format.name(),
            "Loaded standards table"
        );
        Ok(table)
    }

    /// Read, parse and validate a table file
    ///
    /// The format is taken from the file extension.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::Io`] if the file cannot be read, plus
    /// the errors of [`StandardsTable::from_str_with`]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigurationError::Parse {
            format: "unknown",
            message: format!(
                "cannot infer format of {} (expected .toml, .yaml, .yml or .json)",
                path.display()
            ),
        })?;
        let text = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str_with(&text, format)
    }

    /// Serialize the table
    ///
    /// # Errors
    /// Returns [`ConfigurationError::Parse`] if the serializer rejects the
    /// table
    pub fn to_string_with(&self, format: ConfigFormat) -> Result<String, ConfigurationError> {
        let ser_err = |message: String| ConfigurationError::Parse {
            format: format.name(),
            message,
        };
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| ser_err(e.to_string())),
            ConfigFormat::Yaml => serde_yaml::to_string(self).map_err(|e| ser_err(e.to_string())),
            ConfigFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|e| ser_err(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Material;
    use std::io::Write;

    #[test]
    fn format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/b.toml")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path(Path::new("b.YML")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("b.json")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("b.ini")), None);
    }

    #[test]
    fn builtin_survives_every_format() {
        let builtin = StandardsTable::builtin();
        for format in [ConfigFormat::Toml, ConfigFormat::Yaml, ConfigFormat::Json] {
            let text = builtin.to_string_with(format).unwrap();
            let parsed = StandardsTable::from_str_with(&text, format).unwrap();
            assert_eq!(parsed, builtin, "{} round trip", format.name());
        }
    }

    #[test]
    fn load_from_file() {
        let text = StandardsTable::builtin()
            .with_version("city-2025")
            .to_string_with(ConfigFormat::Toml)
            .unwrap();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(text.as_bytes()).unwrap();

        let table = StandardsTable::from_path(file.path()).unwrap();
        assert_eq!(table.version(), "city-2025");
        assert!((table.manning_n(Material::Pvc).unwrap() - 0.011).abs() < 1e-12);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = StandardsTable::from_path("/nonexistent/standards.toml").unwrap_err();
        assert!(matches!(err, ConfigurationError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err =
            StandardsTable::from_str_with("{ \"version\": 3 }", ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigurationError::Parse { format: "JSON", .. }));
    }

    #[test]
    fn inconsistent_table_is_rejected() {
        let json = StandardsTable::builtin()
            .to_string_with(ConfigFormat::Json)
            .unwrap()
            .replace("\"storm_capacity_ceiling\": 0.8", "\"storm_capacity_ceiling\": 1.8");
        let err = StandardsTable::from_str_with(&json, ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidTable(_)));
    }
}
