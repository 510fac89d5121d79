//! Tests for changed-file detection against scratch git repositories
//!
//! Skipped silently when no `git` binary is available.

use relint_core::changes::{collect_changed_files, modified_files};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args([
            "-c",
            "user.email=relint@test",
            "-c",
            "user.name=relint",
            "-c",
            "init.defaultBranch=main",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        status.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&status.stderr)
    );
}

/// A repo with one commit containing `tracked.swift`, `deleted.swift` and a
/// `.gitignore` excluding `ignored.swift`.
fn scratch_repo() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();

    git(dir, &["init", "-q"]);
    std::fs::write(dir.join("tracked.swift"), "let a = 1\n").unwrap();
    std::fs::write(dir.join("deleted.swift"), "let b = 2\n").unwrap();
    std::fs::write(dir.join(".gitignore"), "ignored.swift\n").unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-q", "-m", "init"]);

    tmp
}

#[test]
fn test_modified_and_untracked_files_are_listed() {
    if !git_available() {
        return;
    }

    let repo = scratch_repo();
    let dir = repo.path();

    std::fs::write(dir.join("tracked.swift"), "let a = 2\n").unwrap();
    std::fs::write(dir.join("untracked.swift"), "let c = 3\n").unwrap();
    std::fs::write(dir.join("ignored.swift"), "let d = 4\n").unwrap();

    let mut files = modified_files(dir).unwrap();
    files.sort();

    assert_eq!(
        files,
        [dir.join("tracked.swift"), dir.join("untracked.swift")]
    );
}

#[test]
fn test_clean_repo_lists_nothing() {
    if !git_available() {
        return;
    }

    let repo = scratch_repo();
    assert!(modified_files(repo.path()).unwrap().is_empty());
}

#[test]
fn test_files_deleted_from_disk_are_filtered_out() {
    if !git_available() {
        return;
    }

    let repo = scratch_repo();
    let dir = repo.path();

    std::fs::remove_file(dir.join("deleted.swift")).unwrap();

    // the diff names it, but it no longer exists on disk
    assert!(modified_files(dir).unwrap().is_empty());
}

#[test]
fn test_union_across_roots_collapses_duplicates() {
    if !git_available() {
        return;
    }

    let repo_a = scratch_repo();
    let repo_b = scratch_repo();

    std::fs::write(repo_a.path().join("untracked.swift"), "x\n").unwrap();
    std::fs::write(repo_b.path().join("untracked.swift"), "y\n").unwrap();

    let roots = vec![
        repo_a.path().to_path_buf(),
        repo_b.path().to_path_buf(),
        repo_a.path().to_path_buf(),
    ];
    let files = collect_changed_files(&roots).unwrap();

    assert_eq!(files.len(), 2);
    assert!(files.contains(&repo_a.path().join("untracked.swift")));
    assert!(files.contains(&repo_b.path().join("untracked.swift")));
}

#[test]
fn test_failure_in_one_root_fails_the_collection() {
    if !git_available() {
        return;
    }

    let repo = scratch_repo();
    let not_a_repo = TempDir::new().unwrap();

    let roots = vec![
        repo.path().to_path_buf(),
        not_a_repo.path().to_path_buf(),
    ];

    let err = collect_changed_files(&roots).unwrap_err();
    assert!(format!("{err:#}").contains(&not_a_repo.path().display().to_string()));
}
