//! End-to-end incremental lint pipeline
//!
//! One linear pass: stat the target's files, load the committed state, plan,
//! run fix then lint on the reprocess set, fold the captured output into the
//! new cache, and commit atomically. Any failure before the commit leaves
//! the previously committed state untouched.

use crate::cache::LintCache;
use crate::config::Tool;
use crate::diagnostic::LintSummary;
use crate::exec;
use crate::planner::{self, SourceFile};
use crate::target::Target;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// What one run did and reported
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub target: String,

    /// Files the analysis tool actually ran on this run
    pub reprocessed: usize,

    /// Files whose diagnostics were carried over unchanged
    pub carried_over: usize,

    /// Diagnostic lines captured from this run's lint pass
    pub fresh_diagnostics: Vec<String>,

    /// Diagnostic lines carried over from previous runs
    pub cached_diagnostics: Vec<String>,

    pub summary: LintSummary,
}

impl RunReport {
    fn empty(target: &str) -> Self {
        Self {
            target: target.to_string(),
            ..Self::default()
        }
    }
}

/// Drives the incremental pipeline for one target
pub struct Runner {
    tool: Tool,
    work_dir: PathBuf,
    package_dir: PathBuf,
    extensions: Vec<String>,
}

impl Runner {
    pub fn new(
        tool: Tool,
        work_dir: impl Into<PathBuf>,
        package_dir: impl Into<PathBuf>,
        extensions: Vec<String>,
    ) -> Self {
        Self {
            tool,
            work_dir: work_dir.into(),
            package_dir: package_dir.into(),
            extensions,
        }
    }

    pub fn run(&self, target: &Target) -> Result<RunReport> {
        let files = target.source_files_with_extensions(&self.extensions);
        if files.is_empty() {
            // nothing to analyze, nothing to commit
            return Ok(RunReport::empty(target.name()));
        }

        let store = LintCache::new(&self.work_dir);
        store.prepare()?;

        // files deleted between discovery and now drop out here
        let incoming: Vec<SourceFile> = files.into_iter().filter_map(SourceFile::from_path).collect();
        if incoming.is_empty() {
            return Ok(RunReport::empty(target.name()));
        }

        let mut cache = store.load();
        let prior_output = store.load_prior_output(&mut cache);
        let mut plan = planner::plan(&incoming, &cache, &prior_output);

        let carried_over = plan.carried_over();
        let cached_diagnostics = plan.cached_diagnostics.clone();

        if plan.is_noop() {
            store.commit_clean(&plan.new_cache)?;

            let summary = LintSummary::tally(
                cached_diagnostics.iter().map(String::as_str),
                0,
                carried_over,
            );
            return Ok(RunReport {
                target: target.name().to_string(),
                reprocessed: 0,
                carried_over,
                fresh_diagnostics: Vec::new(),
                cached_diagnostics,
                summary,
            });
        }

        let fix = planner::fix_command(&self.tool, &plan.reprocess, &self.work_dir, &self.package_dir);
        let lint = planner::lint_command(&self.tool, &plan.reprocess, &self.work_dir, &self.package_dir);

        // fix mutates the files lint re-reads, so it must finish first
        exec::run(&fix).with_context(|| format!("running {}", fix.display_name))?;
        let lint_output =
            exec::run(&lint).with_context(|| format!("running {}", lint.display_name))?;

        store.stage_output(&lint_output)?;
        planner::merge_fresh_output(&mut plan.new_cache, &plan.reprocess, &lint_output);
        store.stage_cache(&plan.new_cache)?;
        store.commit()?;

        let fresh_diagnostics: Vec<String> = lint_output
            .lines()
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        let summary = LintSummary::tally(
            fresh_diagnostics
                .iter()
                .chain(cached_diagnostics.iter())
                .map(String::as_str),
            plan.reprocess.len(),
            carried_over,
        );

        Ok(RunReport {
            target: target.name().to_string(),
            reprocessed: plan.reprocess.len(),
            carried_over,
            fresh_diagnostics,
            cached_diagnostics,
            summary,
        })
    }
}
