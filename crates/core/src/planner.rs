//! Partitioning incoming files into reprocess vs carry-over, merging stale
//! diagnostics, and building the fix/lint command pair.

use crate::cache::{CacheEntry, CacheMap};
use crate::config::Tool;
use crate::diagnostic;
use crate::exec::ToolCommand;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A source file as observed on disk at the start of a run
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl SourceFile {
    /// Stat a path into a `SourceFile`. Returns `None` when the file is gone
    /// or unreadable — such files are excluded from planning entirely.
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
        Some(Self { path, modified })
    }
}

/// The planner's decision for one run
#[derive(Debug, Clone)]
pub struct LintPlan {
    /// The cache to commit at the end of this run
    pub new_cache: CacheMap,

    /// Files whose timestamp changed (or were never seen) — the analysis
    /// tool runs on exactly this set
    pub reprocess: BTreeSet<PathBuf>,

    /// All carried-over diagnostics, in cache key order. Surfaced even when
    /// nothing is reprocessed so previously-reported issues stay visible.
    pub cached_diagnostics: Vec<String>,
}

impl LintPlan {
    /// True when no file needs the analysis tool this run
    pub fn is_noop(&self) -> bool {
        self.reprocess.is_empty()
    }

    pub fn carried_over(&self) -> usize {
        self.new_cache.len() - self.reprocess.len()
    }
}

/// Build the plan for a run.
///
/// Files with an unchanged timestamp keep their cache entry verbatim;
/// everything else gets a fresh entry and lands in the reprocess set. Cache
/// entries for files no longer incoming are dropped. Prior-output lines are
/// then folded into the carried entries.
pub fn plan(incoming: &[SourceFile], cache: &CacheMap, prior_output: &str) -> LintPlan {
    let mut new_cache = CacheMap::new();
    let mut reprocess = BTreeSet::new();

    for file in incoming {
        match cache.get(&file.path) {
            Some(entry) if entry.modified == file.modified => {
                new_cache.insert(file.path.clone(), entry.clone());
            }
            _ => {
                new_cache.insert(file.path.clone(), CacheEntry::new(file.modified));
                reprocess.insert(file.path.clone());
            }
        }
    }

    merge_output(&mut new_cache, &reprocess, prior_output, MergeMode::CarriedOnly);

    let cached_diagnostics = new_cache
        .values()
        .filter_map(|entry| entry.diagnostics.as_deref())
        .flatten()
        .cloned()
        .collect();

    LintPlan {
        new_cache,
        reprocess,
        cached_diagnostics,
    }
}

/// Attribute this run's captured lint output to the reprocessed entries, so
/// the committed cache carries fresh diagnostics alongside carried ones.
pub fn merge_fresh_output(cache: &mut CacheMap, reprocess: &BTreeSet<PathBuf>, lint_output: &str) {
    merge_output(cache, reprocess, lint_output, MergeMode::ReprocessedOnly);
}

enum MergeMode {
    /// Prior-run blob: reprocessed paths are superseded, keep the rest
    CarriedOnly,
    /// This run's lint capture: only reprocessed paths receive lines
    ReprocessedOnly,
}

fn merge_output(
    cache: &mut CacheMap,
    reprocess: &BTreeSet<PathBuf>,
    output: &str,
    mode: MergeMode,
) {
    for line in output.lines().filter(|line| !line.is_empty()) {
        let Some(prefix) = diagnostic::path_prefix(line) else {
            continue;
        };
        let path = Path::new(prefix);

        let wanted = match mode {
            MergeMode::CarriedOnly => !reprocess.contains(path),
            MergeMode::ReprocessedOnly => reprocess.contains(path),
        };
        if !wanted {
            continue;
        }

        // lines whose prefix matches no tracked path are dropped silently
        if let Some(entry) = cache.get_mut(path) {
            entry.append_diagnostic(line);
        }
    }
}

/// The auto-fix command over the reprocess set. Must complete before the
/// lint command starts: it mutates the files lint re-reads.
pub fn fix_command(
    tool: &Tool,
    reprocess: &BTreeSet<PathBuf>,
    work_dir: &Path,
    package_dir: &Path,
) -> ToolCommand {
    build_command("--fix", &tool.fix_args, tool, reprocess, work_dir, package_dir)
}

/// The lint command over the same set; its captured stdout becomes the
/// temporary output blob.
pub fn lint_command(
    tool: &Tool,
    reprocess: &BTreeSet<PathBuf>,
    work_dir: &Path,
    package_dir: &Path,
) -> ToolCommand {
    build_command("lint", &tool.lint_args, tool, reprocess, work_dir, package_dir)
}

fn build_command(
    verb: &str,
    tool_args: &[String],
    tool: &Tool,
    reprocess: &BTreeSet<PathBuf>,
    work_dir: &Path,
    package_dir: &Path,
) -> ToolCommand {
    let mut args: Vec<String> = tool_args.to_vec();

    if tool.pass_cache_path {
        args.push("--cache-path".to_string());
        args.push(work_dir.display().to_string());
    }

    // argv passing keeps paths with spaces intact without quoting
    args.extend(reprocess.iter().map(|p| p.display().to_string()));

    let file_names = reprocess
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");

    let tool_name = tool
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| tool.path.display().to_string());

    ToolCommand::new(
        format!("{tool_name} {verb} {file_names}"),
        tool.path.clone(),
        args,
        package_dir,
    )
}
