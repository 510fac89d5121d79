//! Main run command — wires change detection, planning, tool execution and
//! the atomic commit together

use anyhow::Result;
use colored::Colorize;
use relint_core::{collect_changed_files, descriptor_git_roots, RelintConfig, Runner, Target};
use std::path::PathBuf;
use std::time::Instant;

use crate::output;
use crate::Cli;

/// Returns `true` when diagnostics exceed the failure threshold.
pub fn run(files: &[PathBuf], target_name: Option<&str>, cli: &Cli) -> Result<bool> {
    let start = Instant::now();

    eprintln!(
        "{}",
        format!("  relint v{} — incremental lint", relint_core::VERSION).bold()
    );
    eprintln!();

    // ── 1. Context + Config ──────────────────────────────────────
    let context = super::build_context(cli)?;
    let config = RelintConfig::find_and_load(&context.project_dir)?;
    let tool = config.resolved_tool(cli.tool.as_deref())?;

    std::fs::create_dir_all(&context.work_dir)?;

    // ── 2. Input Files ───────────────────────────────────────────
    let input_files: Vec<PathBuf> = if files.is_empty() {
        let roots = descriptor_git_roots(
            &context.project_file,
            &context.project_dir,
            context.repo_root().as_deref(),
            &context.project_cache_path(),
        )?;

        eprint!("  Detecting changes across {} root(s)... ", roots.len());
        let changed = collect_changed_files(&roots)?;
        eprintln!("{} — {} file(s)", "done".green(), changed.len());

        changed.into_iter().collect()
    } else {
        files
            .iter()
            .map(|f| {
                std::fs::canonicalize(f).unwrap_or_else(|_| context.project_dir.join(f))
            })
            .collect()
    };

    let target = Target::synthetic(target_name.unwrap_or("changed-files"), input_files);

    // ── 3. Incremental Pipeline ──────────────────────────────────
    let runner = Runner::new(
        tool,
        &context.work_dir,
        &context.project_dir,
        config.general.extensions.clone(),
    );

    if target.input_files().is_empty() {
        eprintln!("  {}: no input files", target.name().dimmed());
        return Ok(false);
    }

    let report = runner.run(&target)?;

    if report.reprocessed > 0 {
        eprintln!(
            "  {}: processed {} file(s), carried over {}",
            report.target,
            report.reprocessed,
            report.carried_over
        );
    } else {
        eprintln!(
            "  {}: no new files to process, carried over {}",
            report.target, report.carried_over
        );
    }

    // ── 4. Diagnostics ───────────────────────────────────────────
    if !report.fresh_diagnostics.is_empty() {
        eprintln!();
        for line in &report.fresh_diagnostics {
            println!("{}", output::format_diagnostic(line));
        }
    }

    if !report.cached_diagnostics.is_empty() {
        eprintln!();
        eprintln!("  {}", "cached from previous runs:".dimmed());
        for line in &report.cached_diagnostics {
            println!("{}", output::format_diagnostic(line));
        }
    }

    eprintln!();
    eprintln!(
        "{} ({:.1}s)",
        output::format_summary(&report.summary),
        start.elapsed().as_secs_f64()
    );

    let fail_on = cli.fail_on.as_deref().unwrap_or(&config.general.fail_on);
    Ok(report.summary.exceeds_threshold(fail_on))
}
