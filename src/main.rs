//! confbind
//!
//! Renders or checks YAML and property config files with `${VAR}` placeholders
//! resolved from the environment.

use anyhow::Result;
use clap::Parser;
use confbind::cli::{Cli, Command};
use confbind::logging::{self, LogTarget};
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;
    debug!("Parsed arguments: {:?}", cli);

    match cli.command {
        Command::Render(args) => {
            let rendered = args.run()?;
            println!("{}", rendered.trim_end());
        }
        Command::Check(args) => {
            let fields = args.run()?;
            println!(
                "OK: {} field(s) resolved in {}",
                fields,
                args.file.display()
            );
        }
    }

    Ok(())
}
