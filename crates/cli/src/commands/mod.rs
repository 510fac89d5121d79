//! CLI commands

pub mod clean;
pub mod init;
pub mod run;

use crate::Cli;
use anyhow::Result;
use relint_core::RunContext;
use std::path::{Path, PathBuf};

/// Build the run context from command-line overrides, falling back to the
/// environment the IDE's build exports.
pub fn build_context(cli: &Cli) -> Result<RunContext> {
    let context = match &cli.project_file {
        Some(file) => {
            let project_dir = cli
                .project_dir
                .clone()
                .or_else(|| file.parent().map(Path::to_path_buf))
                .unwrap_or_else(|| PathBuf::from("."));
            RunContext::new(file.clone(), project_dir, cli.work_dir.clone())?
        }
        None => RunContext::from_env(cli.work_dir.clone())?,
    };

    Ok(context)
}
