//! Check subcommand for confbind

use super::resolve_inferred;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the check subcommand
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Configuration file to check
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Input format: yaml, property or json (default: from the file extension)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,
}

impl CheckArgs {
    /// Resolve every field, returning how many were checked.
    pub fn run(&self) -> Result<usize> {
        let resolved = resolve_inferred(&self.file, self.format.as_deref())?;
        Ok(resolved.fields)
    }
}
