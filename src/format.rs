//! Configuration file formats.

use crate::error::ConfigError;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Yaml,
    /// Declared for completeness; parsing it is not implemented.
    Json,
    /// TOML-compatible `key = "value"` files.
    Property,
}

impl FileFormat {
    /// Human-readable name used in error reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Yaml => "YAML",
            FileFormat::Json => "JSON",
            FileFormat::Property => "property",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(FileFormat::Yaml),
            "json" => Ok(FileFormat::Json),
            "properties" | "property" | "toml" => Ok(FileFormat::Property),
            other => Err(ConfigError::UnrecognizedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yaml" | "yml" => Ok(FileFormat::Yaml),
            "json" => Ok(FileFormat::Json),
            "property" | "properties" | "toml" => Ok(FileFormat::Property),
            _ => Err(ConfigError::UnrecognizedFormat(s.to_string())),
        }
    }
}
