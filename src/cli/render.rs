//! Render subcommand for confbind
//!
//! Prints a config file with every placeholder resolved.

use super::resolve_inferred;
use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Arguments for the render subcommand
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Configuration file to render
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Input format: yaml, property or json (default: from the file extension)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Output format: yaml (default) or json
    #[arg(short, long, value_enum, default_value_t = RenderFormat::Yaml, value_name = "FORMAT")]
    pub output: RenderFormat,
}

/// Output format for rendered configs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RenderFormat {
    /// YAML document (default)
    #[default]
    #[value(alias = "yml")]
    Yaml,
    /// Pretty-printed JSON
    Json,
}

impl RenderArgs {
    /// Resolve the file and serialize it in the requested output format.
    pub fn run(&self) -> Result<String> {
        let document = resolve_inferred(&self.file, self.format.as_deref())?.document;
        let rendered = match self.output {
            RenderFormat::Yaml => serde_yaml::to_string(&document)?,
            RenderFormat::Json => serde_json::to_string_pretty(&document)?,
        };
        Ok(rendered)
    }
}
