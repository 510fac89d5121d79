//! Timestamp cache and diagnostic blob persistence
//!
//! The committed state is a pair of files in the work directory: `cache.json`
//! (path → modification timestamp + carried diagnostics) and `output.txt`
//! (the previous lint pass's raw output). Both are replaced only by renaming
//! fully-written temporaries over them, so an interrupted run leaves the
//! previous pair intact and at worst orphans the temporaries.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const CACHE_FILE: &str = "cache.json";
const OUTPUT_FILE: &str = "output.txt";
const TMP_EXT: &str = "tmp";

/// One cached file: its modification timestamp as of the last successful
/// analysis, and the diagnostics attributed to it so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub modified: SystemTime,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Vec<String>>,
}

impl CacheEntry {
    pub fn new(modified: SystemTime) -> Self {
        Self {
            modified,
            diagnostics: None,
        }
    }

    /// Append a diagnostic line, creating the list if absent. A line already
    /// present is not appended again, so re-merging the same output blob
    /// leaves the entry unchanged.
    pub fn append_diagnostic(&mut self, line: &str) {
        let diagnostics = self.diagnostics.get_or_insert_with(Vec::new);
        if !diagnostics.iter().any(|d| d == line) {
            diagnostics.push(line.to_string());
        }
    }
}

/// Mapping of absolute source path → cache entry. A `BTreeMap` keeps the
/// serialized document byte-stable across runs with identical contents.
pub type CacheMap = BTreeMap<PathBuf, CacheEntry>;

/// Manages the committed cache/output pair inside a work directory
pub struct LintCache {
    work_dir: PathBuf,
}

impl LintCache {
    pub fn new(work_dir: &Path) -> Self {
        Self {
            work_dir: work_dir.to_path_buf(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn cache_path(&self) -> PathBuf {
        self.work_dir.join(CACHE_FILE)
    }

    pub fn output_path(&self) -> PathBuf {
        self.work_dir.join(OUTPUT_FILE)
    }

    fn cache_tmp_path(&self) -> PathBuf {
        self.work_dir.join(format!("{CACHE_FILE}.{TMP_EXT}"))
    }

    fn output_tmp_path(&self) -> PathBuf {
        self.work_dir.join(format!("{OUTPUT_FILE}.{TMP_EXT}"))
    }

    /// The auxiliary empty directory declared as the produced-file location.
    /// The build system requires it to exist; nothing is ever written there.
    pub fn output_files_dir(&self) -> PathBuf {
        self.work_dir.join("output")
    }

    /// Create the work directory layout and drop temporaries orphaned by an
    /// interrupted earlier run.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.work_dir)
            .with_context(|| format!("creating work dir {}", self.work_dir.display()))?;
        fs::create_dir_all(self.output_files_dir())
            .with_context(|| format!("creating {}", self.output_files_dir().display()))?;

        let _ = fs::remove_file(self.cache_tmp_path());
        let _ = fs::remove_file(self.output_tmp_path());

        Ok(())
    }

    /// Load the committed cache. A missing or corrupt file yields an empty
    /// map — this never fails the run.
    pub fn load(&self) -> CacheMap {
        fs::read(self.cache_path())
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default()
    }

    /// Load the previous run's raw diagnostic blob.
    ///
    /// An empty cache short-circuits to `""` without touching disk. A
    /// non-empty cache whose blob cannot be read is an inconsistency: the
    /// in-memory cache is reset to empty as well, since carried diagnostics
    /// without their blob cannot be trusted. Losing them only costs a fuller
    /// reprocess.
    pub fn load_prior_output(&self, cache: &mut CacheMap) -> String {
        if cache.is_empty() {
            return String::new();
        }

        match fs::read_to_string(self.output_path()) {
            Ok(text) => text,
            Err(_) => {
                cache.clear();
                String::new()
            }
        }
    }

    /// Write the new cache document to its temporary location.
    pub fn stage_cache(&self, cache: &CacheMap) -> Result<()> {
        let json = serde_json::to_string_pretty(cache).context("serializing cache")?;
        fs::write(self.cache_tmp_path(), json)
            .with_context(|| format!("writing {}", self.cache_tmp_path().display()))?;
        Ok(())
    }

    /// Write the captured lint output to its temporary location.
    pub fn stage_output(&self, blob: &str) -> Result<()> {
        fs::write(self.output_tmp_path(), blob)
            .with_context(|| format!("writing {}", self.output_tmp_path().display()))?;
        Ok(())
    }

    /// Rename both staged temporaries over the committed pair, output first.
    ///
    /// Callers invoke this only after every planned external command
    /// succeeded; a reader observes either the fully-previous or the
    /// fully-new state.
    pub fn commit(&self) -> Result<()> {
        fs::rename(self.output_tmp_path(), self.output_path())
            .with_context(|| format!("committing {}", self.output_path().display()))?;
        fs::rename(self.cache_tmp_path(), self.cache_path())
            .with_context(|| format!("committing {}", self.cache_path().display()))?;
        Ok(())
    }

    /// The no-reprocess fast path: nothing ran, so the new cache and an
    /// empty output blob are committed directly.
    pub fn commit_clean(&self, cache: &CacheMap) -> Result<()> {
        let json = serde_json::to_string_pretty(cache).context("serializing cache")?;
        fs::write(self.cache_path(), json)
            .with_context(|| format!("writing {}", self.cache_path().display()))?;
        fs::write(self.output_path(), "")
            .with_context(|| format!("writing {}", self.output_path().display()))?;
        Ok(())
    }

    /// Remove all committed and staged artifacts, forcing the next run to
    /// reprocess everything.
    pub fn clear(&self) -> Result<()> {
        for path in [
            self.cache_path(),
            self.output_path(),
            self.cache_tmp_path(),
            self.output_tmp_path(),
        ] {
            if path.exists() {
                fs::remove_file(&path)
                    .with_context(|| format!("removing {}", path.display()))?;
            }
        }
        Ok(())
    }
}
