//! Config file parsers.
//!
//! One parser type covers the three ways of binding a file, selected by
//! [`ShapePlan`]:
//! - [`ShapePlan::InPlace`] - the record's own schema is the file shape (all strings)
//! - [`ShapePlan::Loosened`] - the file is read through an all-string copy of the
//!   record's schema, then coerced into the record's types
//! - [`ShapePlan::Strict`] - the file is read through a separately declared
//!   all-string schema, then coerced into the strict record
//!
//! Plans are validated when the parser is built, before any file is touched.

use super::file::FileConfiguration;
use super::loose::LooseShape;
use super::reconcile::Reconciler;
use super::schema::{ConfigSchema, Schema, SchemaError};
use crate::env::{BraceEnvironmentLoader, EnvironmentLoader};
use crate::error::{ConfigError, ConfigResult, FileConfigError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing::{info, warn};

/// Which pair of schemas a parser reconciles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapePlan {
    InPlace(Schema),
    Loosened(Schema),
    Strict { loose: Schema, strict: Schema },
}

impl ShapePlan {
    /// Check the plan's schemas against each other.
    pub fn validate(&self) -> Result<(), SchemaError> {
        match self {
            ShapePlan::InPlace(schema) => schema.check_loose(),
            ShapePlan::Loosened(schema) => schema.check_bindable(),
            ShapePlan::Strict { loose, strict } => {
                loose.check_loose()?;
                strict.check_bindable()?;
                loose.check_matches(strict)
            }
        }
    }

    /// Shape the file is read through.
    pub fn input(&self) -> Schema {
        match self {
            ShapePlan::InPlace(schema) => schema.clone(),
            ShapePlan::Loosened(schema) => schema.loosened(),
            ShapePlan::Strict { loose, .. } => loose.clone(),
        }
    }

    /// Shape of the produced record.
    pub fn output(&self) -> &Schema {
        match self {
            ShapePlan::InPlace(schema) | ShapePlan::Loosened(schema) => schema,
            ShapePlan::Strict { strict, .. } => strict,
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            ShapePlan::InPlace(_) => "in-place",
            ShapePlan::Loosened(_) => "loose",
            ShapePlan::Strict { .. } => "strict",
        }
    }
}

/// Parses one configuration file into a `T`.
#[derive(Debug)]
pub struct ConfigFileParser<T, E = BraceEnvironmentLoader> {
    file: FileConfiguration<E>,
    plan: ShapePlan,
    input: Schema,
    _record: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned, E: EnvironmentLoader> ConfigFileParser<T, E> {
    /// Build a parser for an explicit plan.
    pub fn new(file: FileConfiguration<E>, plan: ShapePlan) -> ConfigResult<Self> {
        plan.validate()?;
        let input = plan.input();
        Ok(Self {
            file,
            plan,
            input,
            _record: PhantomData,
        })
    }

    pub fn file(&self) -> &FileConfiguration<E> {
        &self.file
    }

    pub fn plan(&self) -> &ShapePlan {
        &self.plan
    }

    /// Read, resolve and bind the file.
    pub fn parse(&self) -> ConfigResult<T> {
        let document = self.resolve()?;
        serde_json::from_value(document).map_err(|source| ConfigError::Destination {
            schema: self.plan.output().name().to_string(),
            source,
        })
    }

    /// Read and resolve the file without binding it to `T`.
    pub fn resolve(&self) -> ConfigResult<Value> {
        let shape = self.file.read_shape(&self.input)?;
        self.reconcile(&shape)
    }

    /// Resolve content already read from the file.
    pub(crate) fn resolve_content(&self, content: &str) -> ConfigResult<Value> {
        let shape = self.file.project(content, &self.input)?;
        self.reconcile(&shape)
    }

    fn reconcile(&self, shape: &LooseShape) -> ConfigResult<Value> {
        let reconciled =
            Reconciler::new(self.file.loader()).reconcile(shape, self.plan.output())?;
        if !reconciled.is_clean() {
            warn!(
                "Found {} field error(s) in '{}'",
                reconciled.errors.len(),
                self.file.path().display()
            );
            return Err(FileConfigError {
                config_file: self.file.path().to_path_buf(),
                format: self.file.format(),
                field_errors: reconciled.errors,
            }
            .into());
        }

        info!(
            "Config '{}' loaded successfully ({} pass, {} field(s)).",
            self.file.path().display(),
            self.plan.mode(),
            self.plan.output().leaf_count()
        );
        Ok(reconciled.value)
    }
}

impl<T: ConfigSchema + DeserializeOwned, E: EnvironmentLoader> ConfigFileParser<T, E> {
    /// Read the file through an all-string copy of `T`'s schema.
    pub fn loose(file: FileConfiguration<E>) -> ConfigResult<Self> {
        Self::new(file, ShapePlan::Loosened(T::schema()))
    }

    /// Read the file straight through `T`'s schema, whose leaves must all be strings.
    pub fn in_place(file: FileConfiguration<E>) -> ConfigResult<Self> {
        Self::new(file, ShapePlan::InPlace(T::schema()))
    }

    /// Read the file through `L`'s all-string schema and coerce into `T`.
    pub fn strict<L: ConfigSchema>(file: FileConfiguration<E>) -> ConfigResult<Self> {
        Self::new(
            file,
            ShapePlan::Strict {
                loose: L::schema(),
                strict: T::schema(),
            },
        )
    }
}

impl<T: ConfigSchema + DeserializeOwned> ConfigFileParser<T, BraceEnvironmentLoader> {
    pub fn yaml(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        Self::loose(FileConfiguration::yaml(path))
    }

    pub fn property(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        Self::loose(FileConfiguration::property(path))
    }

    pub fn strict_yaml<L: ConfigSchema>(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        Self::strict::<L>(FileConfiguration::yaml(path))
    }

    pub fn strict_property<L: ConfigSchema>(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        Self::strict::<L>(FileConfiguration::property(path))
    }
}
