//! Typed configuration binding.
//!
//! Reads YAML and property (TOML) files, substitutes `${VAR}` placeholders and
//! coerces leaves into the types a record declares, reporting every bad field at
//! once.

pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod format;
pub mod logging;

pub use config::{
    ConfigFileParser, ConfigSchema, Field, FieldKind, FileConfiguration, IntWidth, Schema,
    ShapePlan,
};
pub use env::{BraceEnvironmentLoader, EnvError, EnvironmentLoader};
pub use error::{ConfigError, ConfigResult, FieldError, FileConfigError};
pub use format::FileFormat;
