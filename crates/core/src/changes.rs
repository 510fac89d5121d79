//! Changed-file detection across version-control roots
//!
//! Two listing queries per root: files modified relative to the last commit,
//! and files on disk that are neither tracked nor ignored. Results resolve
//! to absolute paths, drop anything no longer on disk, and union across
//! roots.

use crate::exec::{self, ToolCommand};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// List changed files in one version-control root: modified-tracked plus
/// untracked-but-not-ignored, resolved against the root and filtered to
/// files that still exist.
pub fn modified_files(root: &Path) -> Result<Vec<PathBuf>> {
    let diff = run_git(root, &["diff", "HEAD", "--name-only"])?;
    let untracked = run_git(root, &["ls-files", "--others", "--exclude-standard"])?;

    Ok(diff
        .lines()
        .chain(untracked.lines())
        .filter(|line| !line.is_empty())
        .map(|rel| root.join(rel))
        .filter(|abs| abs.is_file())
        .collect())
}

/// Union changed files across all roots, duplicates collapsed by path.
///
/// Roots are queried in parallel — the union is commutative, so ordering
/// doesn't matter. A listing-query failure in any root fails the whole
/// collection with the root named; one broken root is never allowed to
/// silently shrink the result set.
pub fn collect_changed_files(roots: &[PathBuf]) -> Result<BTreeSet<PathBuf>> {
    let per_root: Vec<Result<Vec<PathBuf>>> = roots
        .par_iter()
        .map(|root| {
            modified_files(root)
                .with_context(|| format!("listing changed files in {}", root.display()))
        })
        .collect();

    let mut files = BTreeSet::new();
    for result in per_root {
        files.extend(result?);
    }

    Ok(files)
}

fn run_git(root: &Path, args: &[&str]) -> Result<String> {
    let command = ToolCommand::new(
        format!("git {}", args.join(" ")),
        "git",
        args.iter().map(|a| a.to_string()).collect(),
        root,
    );

    exec::run(&command).with_context(|| format!("running `{}` in {}", command.display_name, root.display()))
}
