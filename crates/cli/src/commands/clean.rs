//! Clean command — drop committed cache state so the next run reprocesses
//! everything

use anyhow::Result;
use colored::Colorize;
use relint_core::LintCache;

use crate::Cli;

pub fn run(cli: &Cli) -> Result<()> {
    let context = super::build_context(cli)?;

    LintCache::new(&context.work_dir).clear()?;
    let _ = std::fs::remove_file(context.project_cache_path());

    eprintln!("  {}", "Cache cleared.".green());
    Ok(())
}
