//! Relint CLI library — exposed for integration tests

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "relint")]
#[command(about = "Incremental linting that only re-analyzes what changed", long_about = None)]
#[command(version = relint_core::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the analysis tool binary (overrides [tool] path)
    #[arg(long, global = true)]
    pub tool: Option<PathBuf>,

    /// Work directory for cache and output (default: <project dir>/.relint-cache)
    #[arg(long, global = true)]
    pub work_dir: Option<PathBuf>,

    /// Project descriptor document (overrides PROJECT_FILE_PATH)
    #[arg(long, global = true)]
    pub project_file: Option<PathBuf>,

    /// Project directory (overrides PROJECT_DIR)
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Severity threshold for non-zero exit: error, warning, info, never
    #[arg(long, global = true)]
    pub fail_on: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize .relint.toml configuration
    Init {
        /// Path to initialize (default: current directory)
        path: Option<PathBuf>,
    },

    /// Lint changed files incrementally (default command)
    Run {
        /// Target name used in reporting
        #[arg(long)]
        target: Option<String>,

        /// Explicit input files (skips change detection)
        files: Vec<PathBuf>,
    },

    /// Remove the committed cache and output so the next run starts fresh
    Clean,
}
