//! Error types for configuration parsing.
//!
//! Two kinds of failure are kept apart:
//! - [`FieldError`]: one leaf that could not be resolved or coerced. These are
//!   collected across the whole file and reported together in a [`FileConfigError`].
//! - [`ConfigError`]: everything that stops a parse outright (missing file,
//!   malformed content, unsupported format, incompatible schemas).

use crate::config::SchemaError;
use crate::format::FileFormat;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Message used when a leaf failed to resolve because it holds no value.
pub const EMPTY_FIELD_MESSAGE: &str = "field is empty";

/// A single leaf-level resolution or coercion failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// `"<field name>: <raw value>"`
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error found with field '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for FieldError {}

/// Render field errors one per line as `<field> - '<message>'`.
pub fn render_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} - '{}'", e.field, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// All field errors collected while parsing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConfigError {
    pub config_file: PathBuf,
    pub format: FileFormat,
    pub field_errors: Vec<FieldError>,
}

impl fmt::Display for FileConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "found {} error(s) while parsing {} config file({}):\n{}",
            self.field_errors.len(),
            self.format,
            self.config_file.display(),
            render_field_errors(&self.field_errors)
        )
    }
}

impl std::error::Error for FileConfigError {}

/// Terminal failure of a parse.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to unmarshal {format} configuration file {}: {message}", path.display())]
    Deserialize {
        path: PathBuf,
        format: FileFormat,
        message: String,
    },

    #[error("{0} parser not implemented yet")]
    NotImplemented(FileFormat),

    #[error("unrecognized file format: {0}")]
    UnrecognizedFormat(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Fields(#[from] FileConfigError),

    #[error("failed to build '{schema}' from resolved values: {source}")]
    Destination {
        schema: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Field errors carried by this error, if it is an aggregated field report.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ConfigError::Fields(e) => &e.field_errors,
            _ => &[],
        }
    }
}

/// Result type for configuration parsing.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
