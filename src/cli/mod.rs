//! CLI command definitions for confbind
//!
//! The binary binds files without a record type: the schema is inferred from the
//! file's own tables, every leaf is treated as a string, and placeholders are
//! resolved against the process environment. Sequences have no string form, so a
//! file containing one is rejected.

pub mod check;
pub mod render;

use crate::config::{ConfigFileParser, FileConfiguration, ShapePlan, ensure_exists};
use crate::env::BraceEnvironmentLoader;
use crate::error::ConfigResult;
use crate::format::FileFormat;
use check::CheckArgs;
use clap::{Parser, Subcommand};
use render::RenderArgs;
use serde_json::Value;
use std::path::Path;

/// Resolve ${VAR} placeholders in YAML and property config files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the file with every placeholder resolved
    Render(RenderArgs),

    /// Report every field that fails to resolve
    Check(CheckArgs),
}

/// A file resolved through a schema inferred from its own tables.
#[derive(Debug, Clone, PartialEq)]
pub struct InferredConfig {
    pub document: Value,
    /// Number of leaves resolved.
    pub fields: usize,
}

/// Read `file` once, infer its schema and resolve every leaf in place.
///
/// `format` overrides the format guessed from the file extension.
pub fn resolve_inferred(file: &Path, format: Option<&str>) -> ConfigResult<InferredConfig> {
    ensure_exists(file)?;
    let format = match format {
        Some(name) => name.parse::<FileFormat>()?,
        None => FileFormat::from_path(file)?,
    };
    let config = FileConfiguration::new(file, format, BraceEnvironmentLoader::new());
    let content = config.read_source()?;
    let name = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("config");
    let schema = config.outline(name, &content)?;
    let fields = schema.leaf_count();

    let parser = ConfigFileParser::<Value>::new(config, ShapePlan::InPlace(schema))?;
    let document = parser.resolve_content(&content)?;
    Ok(InferredConfig { document, fields })
}
