//! Tests for partitioning, diagnostic merging and command planning

use relint_core::config::Tool;
use relint_core::planner::{self, SourceFile};
use relint_core::{CacheEntry, CacheMap};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn stamp(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

fn source(path: &str, secs: u64) -> SourceFile {
    SourceFile {
        path: PathBuf::from(path),
        modified: stamp(secs),
    }
}

fn entry_with_diags(secs: u64, lines: &[&str]) -> CacheEntry {
    let mut entry = CacheEntry::new(stamp(secs));
    for line in lines {
        entry.append_diagnostic(line);
    }
    entry
}

fn test_tool() -> Tool {
    Tool {
        path: PathBuf::from("/opt/bin/swiftlint"),
        fix_args: vec!["--fix".into(), "--quiet".into()],
        lint_args: vec!["--quiet".into()],
        pass_cache_path: true,
    }
}

#[test]
fn test_unchanged_file_is_carried_over() {
    let mut cache = CacheMap::new();
    cache.insert(
        PathBuf::from("/src/a.swift"),
        entry_with_diags(100, &["/src/a.swift:1:1: warning: w"]),
    );

    let plan = planner::plan(&[source("/src/a.swift", 100)], &cache, "");

    assert!(plan.is_noop());
    assert_eq!(plan.carried_over(), 1);
    assert_eq!(
        plan.new_cache[Path::new("/src/a.swift")],
        entry_with_diags(100, &["/src/a.swift:1:1: warning: w"])
    );
    assert_eq!(plan.cached_diagnostics, ["/src/a.swift:1:1: warning: w"]);
}

#[test]
fn test_touched_file_is_reprocessed() {
    let mut cache = CacheMap::new();
    cache.insert(
        PathBuf::from("/src/a.swift"),
        entry_with_diags(100, &["/src/a.swift:1:1: warning: w"]),
    );

    let plan = planner::plan(&[source("/src/a.swift", 150)], &cache, "");

    assert!(!plan.is_noop());
    assert!(plan.reprocess.contains(Path::new("/src/a.swift")));

    // the fresh entry carries the new timestamp and no diagnostics yet
    let entry = &plan.new_cache[Path::new("/src/a.swift")];
    assert_eq!(entry.modified, stamp(150));
    assert!(entry.diagnostics.is_none());
    assert!(plan.cached_diagnostics.is_empty());
}

#[test]
fn test_unknown_file_is_reprocessed() {
    let plan = planner::plan(&[source("/src/new.swift", 100)], &CacheMap::new(), "");

    assert_eq!(plan.reprocess.len(), 1);
    assert!(plan.reprocess.contains(Path::new("/src/new.swift")));
}

#[test]
fn test_dropped_files_leave_the_cache() {
    let mut cache = CacheMap::new();
    cache.insert(PathBuf::from("/src/gone.swift"), CacheEntry::new(stamp(100)));
    cache.insert(PathBuf::from("/src/kept.swift"), CacheEntry::new(stamp(100)));

    let plan = planner::plan(&[source("/src/kept.swift", 100)], &cache, "");

    assert_eq!(plan.new_cache.len(), 1);
    assert!(plan.new_cache.contains_key(Path::new("/src/kept.swift")));
}

#[test]
fn test_touch_one_of_many() {
    let mut cache = CacheMap::new();
    cache.insert(PathBuf::from("/src/a.swift"), CacheEntry::new(stamp(100)));
    cache.insert(PathBuf::from("/src/b.swift"), CacheEntry::new(stamp(100)));
    cache.insert(PathBuf::from("/src/c.swift"), CacheEntry::new(stamp(100)));

    let incoming = [
        source("/src/a.swift", 100),
        source("/src/b.swift", 175),
        source("/src/c.swift", 100),
    ];
    let plan = planner::plan(&incoming, &cache, "");

    assert_eq!(plan.reprocess.len(), 1);
    assert!(plan.reprocess.contains(Path::new("/src/b.swift")));
    assert_eq!(plan.carried_over(), 2);
}

#[test]
fn test_merge_attributes_carried_lines_and_drops_reprocessed() {
    // cache = {A@t0 with a warning}, incoming = [A@t0, B@t1]
    let mut cache = CacheMap::new();
    cache.insert(
        PathBuf::from("/src/a.swift"),
        entry_with_diags(100, &["/src/a.swift:1:1: warning: w"]),
    );

    let incoming = [source("/src/a.swift", 100), source("/src/b.swift", 200)];
    let prior_output = "/src/a.swift:1:1: warning: w\n/src/b.swift:9:1: warning: old\n";

    let plan = planner::plan(&incoming, &cache, prior_output);

    assert_eq!(
        plan.reprocess.iter().collect::<Vec<_>>(),
        [Path::new("/src/b.swift")]
    );

    // A keeps exactly one copy of its line; B's stale line is superseded
    assert_eq!(
        plan.new_cache[Path::new("/src/a.swift")]
            .diagnostics
            .as_deref()
            .unwrap(),
        ["/src/a.swift:1:1: warning: w"]
    );
    assert!(plan.new_cache[Path::new("/src/b.swift")].diagnostics.is_none());
    assert_eq!(plan.cached_diagnostics, ["/src/a.swift:1:1: warning: w"]);
}

#[test]
fn test_merge_drops_lines_for_untracked_paths() {
    // blob mentions A (unchanged) and C (no longer on disk)
    let mut cache = CacheMap::new();
    cache.insert(PathBuf::from("/src/a.swift"), CacheEntry::new(stamp(100)));
    cache.insert(PathBuf::from("/src/c.swift"), CacheEntry::new(stamp(100)));

    let incoming = [source("/src/a.swift", 100)];
    let prior_output = "/src/a.swift:1:1: warning: w\n/src/c.swift:3:1: warning: gone\n";

    let plan = planner::plan(&incoming, &cache, prior_output);

    assert_eq!(
        plan.new_cache[Path::new("/src/a.swift")]
            .diagnostics
            .as_deref()
            .unwrap(),
        ["/src/a.swift:1:1: warning: w"]
    );
    assert!(!plan.new_cache.contains_key(Path::new("/src/c.swift")));
    assert_eq!(plan.cached_diagnostics, ["/src/a.swift:1:1: warning: w"]);
}

#[test]
fn test_merge_ignores_unparseable_lines() {
    let mut cache = CacheMap::new();
    cache.insert(PathBuf::from("/src/a.swift"), CacheEntry::new(stamp(100)));

    let incoming = [source("/src/a.swift", 100)];
    let plan = planner::plan(&incoming, &cache, "no colon here\n\n:empty prefix\n");

    assert!(plan.new_cache[Path::new("/src/a.swift")].diagnostics.is_none());
    assert!(plan.cached_diagnostics.is_empty());
}

#[test]
fn test_replan_from_committed_state_is_idempotent() {
    let mut cache = CacheMap::new();
    cache.insert(
        PathBuf::from("/src/a.swift"),
        entry_with_diags(100, &["/src/a.swift:1:1: warning: w"]),
    );

    let incoming = [source("/src/a.swift", 100)];
    let prior_output = "/src/a.swift:1:1: warning: w\n";

    let first = planner::plan(&incoming, &cache, prior_output);
    let second = planner::plan(&incoming, &first.new_cache, prior_output);

    assert!(second.is_noop());
    assert_eq!(second.new_cache, first.new_cache);
    assert_eq!(second.cached_diagnostics, first.cached_diagnostics);
}

#[test]
fn test_merge_fresh_output_lands_on_reprocessed_entries() {
    // scenario: A carried, B reprocessed; the lint pass reports on B
    let mut cache = CacheMap::new();
    cache.insert(
        PathBuf::from("/src/a.swift"),
        entry_with_diags(100, &["/src/a.swift:1:1: warning: w"]),
    );

    let incoming = [source("/src/a.swift", 100), source("/src/b.swift", 200)];
    let mut plan = planner::plan(&incoming, &cache, "/src/a.swift:1:1: warning: w\n");

    planner::merge_fresh_output(
        &mut plan.new_cache,
        &plan.reprocess,
        "/src/b.swift:2:1: error: e\n/src/a.swift:5:1: warning: not mine\n",
    );

    assert_eq!(
        plan.new_cache[Path::new("/src/b.swift")]
            .diagnostics
            .as_deref()
            .unwrap(),
        ["/src/b.swift:2:1: error: e"]
    );
    // carried entries never receive fresh lines
    assert_eq!(
        plan.new_cache[Path::new("/src/a.swift")]
            .diagnostics
            .as_deref()
            .unwrap(),
        ["/src/a.swift:1:1: warning: w"]
    );
}

#[test]
fn test_fix_and_lint_commands_cover_exactly_the_reprocess_set() {
    let incoming = [source("/src/b b.swift", 200), source("/src/a.swift", 100)];
    let plan = planner::plan(&incoming, &CacheMap::new(), "");

    let tool = test_tool();
    let fix = planner::fix_command(&tool, &plan.reprocess, Path::new("/work"), Path::new("/pkg"));
    let lint = planner::lint_command(&tool, &plan.reprocess, Path::new("/work"), Path::new("/pkg"));

    assert_eq!(fix.program, PathBuf::from("/opt/bin/swiftlint"));
    assert_eq!(fix.cwd, PathBuf::from("/pkg"));
    assert_eq!(
        fix.args,
        [
            "--fix",
            "--quiet",
            "--cache-path",
            "/work",
            "/src/a.swift",
            "/src/b b.swift"
        ]
    );

    assert_eq!(
        lint.args,
        [
            "--quiet",
            "--cache-path",
            "/work",
            "/src/a.swift",
            "/src/b b.swift"
        ]
    );
    assert!(lint.display_name.contains("a.swift"));
}

#[test]
fn test_commands_omit_cache_path_when_disabled() {
    let mut tool = test_tool();
    tool.pass_cache_path = false;

    let plan = planner::plan(&[source("/src/a.swift", 100)], &CacheMap::new(), "");
    let fix = planner::fix_command(&tool, &plan.reprocess, Path::new("/work"), Path::new("/pkg"));

    assert_eq!(fix.args, ["--fix", "--quiet", "/src/a.swift"]);
}
