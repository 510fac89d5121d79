//! Relint CLI - incremental lint runner

use anyhow::Result;
use clap::Parser;
use relint_cli::{commands, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let failed = match cli.command {
        Some(Commands::Init { ref path }) => {
            commands::init::run(path.as_deref())?;
            false
        }
        Some(Commands::Run {
            ref target,
            ref files,
        }) => commands::run::run(files, target.as_deref(), &cli)?,
        Some(Commands::Clean) => {
            commands::clean::run(&cli)?;
            false
        }
        None => {
            // Default command is an incremental run over changed files
            commands::run::run(&[], None, &cli)?
        }
    };

    if failed {
        std::process::exit(1);
    }

    Ok(())
}
