//! Run context derived from the build environment
//!
//! One immutable value constructed at process start and threaded through
//! every component that needs it. Required values missing from the
//! environment surface as descriptive errors up front, never as panics deep
//! in the pipeline.

use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PROJECT_FILE_VAR: &str = "PROJECT_FILE_PATH";
pub const PROJECT_DIR_VAR: &str = "PROJECT_DIR";
pub const WORKSPACE_DIR_VAR: &str = "WORKSPACE_DIR";
pub const SRC_ROOT_VAR: &str = "SRCROOT";

const DEFAULT_WORK_DIR: &str = ".relint-cache";

/// Error types for context construction
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("required environment variable {0} is not set (and no command-line override given)")]
    MissingVar(&'static str),

    #[error("project descriptor `{0}` does not exist")]
    MissingProjectFile(PathBuf),

    #[error("project directory `{0}` does not exist")]
    MissingProjectDir(PathBuf),
}

/// Everything a run needs to know about where it lives
#[derive(Debug, Clone)]
pub struct RunContext {
    /// The IDE project descriptor document
    pub project_file: PathBuf,

    /// Directory containing the project — the working directory for tool
    /// invocations and the base for relative descriptor paths
    pub project_dir: PathBuf,

    /// Enclosing workspace, when the build provides one
    pub workspace_dir: Option<PathBuf>,

    /// Source root, when the build provides one
    pub src_root: Option<PathBuf>,

    /// Where cache, output blob and project cache live
    pub work_dir: PathBuf,
}

impl RunContext {
    /// Build a context from explicit values, validating the preconditions
    /// every later stage relies on.
    pub fn new(
        project_file: PathBuf,
        project_dir: PathBuf,
        work_dir: Option<PathBuf>,
    ) -> Result<Self, ContextError> {
        if !project_file.exists() {
            return Err(ContextError::MissingProjectFile(project_file));
        }
        if !project_dir.is_dir() {
            return Err(ContextError::MissingProjectDir(project_dir));
        }

        let work_dir = work_dir.unwrap_or_else(|| project_dir.join(DEFAULT_WORK_DIR));

        Ok(Self {
            project_file,
            project_dir,
            workspace_dir: None,
            src_root: None,
            work_dir,
        })
    }

    /// Build a context from the environment the IDE's build exports.
    pub fn from_env(work_dir: Option<PathBuf>) -> Result<Self, ContextError> {
        let project_file = require_var(PROJECT_FILE_VAR)?;
        let project_dir = require_var(PROJECT_DIR_VAR)?;

        let mut context = Self::new(project_file, project_dir, work_dir)?;
        context.workspace_dir = env::var_os(WORKSPACE_DIR_VAR).map(PathBuf::from);
        context.src_root = env::var_os(SRC_ROOT_VAR).map(PathBuf::from);

        Ok(context)
    }

    /// The outermost directory under version control: the first of workspace
    /// dir, source root and project dir that contains `.git`.
    pub fn repo_root(&self) -> Option<PathBuf> {
        [
            self.workspace_dir.as_deref(),
            self.src_root.as_deref(),
            Some(self.project_dir.as_path()),
        ]
        .into_iter()
        .flatten()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
    }

    /// Location of the mtime-keyed project cache document
    pub fn project_cache_path(&self) -> PathBuf {
        self.work_dir.join("project_cache.json")
    }
}

fn require_var(name: &'static str) -> Result<PathBuf, ContextError> {
    env::var_os(name)
        .map(PathBuf::from)
        .ok_or(ContextError::MissingVar(name))
}
