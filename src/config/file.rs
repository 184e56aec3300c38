//! Configuration file descriptor and format-specific reading.
//!
//! The file is read once into memory; its content is then projected onto a schema
//! by the reader for its format.

use super::loose::LooseShape;
use super::schema::Schema;
use super::source;
use crate::env::{BraceEnvironmentLoader, EnvironmentLoader};
use crate::error::{ConfigError, ConfigResult};
use crate::format::FileFormat;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Which file to read, how to read it and how to resolve its values.
#[derive(Debug, Clone)]
pub struct FileConfiguration<E = BraceEnvironmentLoader> {
    path: PathBuf,
    format: FileFormat,
    loader: E,
}

impl<E: EnvironmentLoader> FileConfiguration<E> {
    pub fn new(path: impl Into<PathBuf>, format: FileFormat, loader: E) -> Self {
        Self {
            path: path.into(),
            format,
            loader,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn loader(&self) -> &E {
        &self.loader
    }

    /// Read the file's content.
    ///
    /// Fails with [`ConfigError::NotFound`] before touching the content when the
    /// path does not exist.
    pub fn read_source(&self) -> ConfigResult<String> {
        ensure_exists(&self.path)?;

        info!(
            "Loading {} config from path: '{}'...",
            self.format,
            self.path.display()
        );
        match self.format {
            FileFormat::Yaml | FileFormat::Property => self.read_content(),
            FileFormat::Json => Err(ConfigError::NotImplemented(FileFormat::Json)),
        }
    }

    /// Read the file through `schema`.
    pub fn read_shape(&self, schema: &Schema) -> ConfigResult<LooseShape> {
        let content = self.read_source()?;
        self.project(&content, schema)
    }

    /// Project already-read content onto `schema`.
    pub fn project(&self, content: &str, schema: &Schema) -> ConfigResult<LooseShape> {
        if content.trim().is_empty() {
            return Ok(LooseShape::empty(schema));
        }
        match self.format {
            FileFormat::Yaml => source::project_yaml(content, schema)
                .map_err(|e| self.deserialize_error(e.to_string())),
            FileFormat::Property => source::project_toml(content, schema)
                .map_err(|e| self.deserialize_error(e.to_string())),
            FileFormat::Json => Err(ConfigError::NotImplemented(FileFormat::Json)),
        }
    }

    /// All-string schema named `name` mirroring the tables of `content`.
    pub fn outline(&self, name: &str, content: &str) -> ConfigResult<Schema> {
        if content.trim().is_empty() {
            return Ok(Schema::new(name));
        }
        match self.format {
            FileFormat::Yaml => source::outline_yaml(name, content)
                .map_err(|e| self.deserialize_error(e.to_string())),
            FileFormat::Property => source::outline_toml(name, content)
                .map_err(|e| self.deserialize_error(e.to_string())),
            FileFormat::Json => Err(ConfigError::NotImplemented(FileFormat::Json)),
        }
    }

    fn deserialize_error(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::Deserialize {
            path: self.path.clone(),
            format: self.format,
            message: message.into(),
        }
    }

    fn read_content(&self) -> ConfigResult<String> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        debug!("Read {} bytes from '{}'", content.len(), self.path.display());
        Ok(content)
    }
}

impl FileConfiguration<BraceEnvironmentLoader> {
    /// YAML file resolved against the process environment.
    pub fn yaml(path: impl Into<PathBuf>) -> Self {
        Self::new(path, FileFormat::Yaml, BraceEnvironmentLoader::new())
    }

    /// Property (TOML) file resolved against the process environment.
    pub fn property(path: impl Into<PathBuf>) -> Self {
        Self::new(path, FileFormat::Property, BraceEnvironmentLoader::new())
    }

    /// Format taken from the file extension.
    pub fn from_path(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let format = FileFormat::from_path(&path)?;
        Ok(Self::new(path, format, BraceEnvironmentLoader::new()))
    }
}

/// Fails with [`ConfigError::NotFound`] when nothing is at `path`, and with
/// [`ConfigError::Read`] when the path cannot be inspected.
pub(crate) fn ensure_exists(path: &Path) -> ConfigResult<()> {
    match std::fs::metadata(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
