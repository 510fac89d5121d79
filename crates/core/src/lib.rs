//! Relint Core - Incremental Lint Orchestration Engine
//!
//! This crate provides the machinery behind relint:
//! - Changed-file detection across version-control roots
//! - A timestamp cache with crash-safe atomic commits
//! - Partitioning into reprocess vs carry-over and diagnostic merging
//! - Source path resolution over the IDE project descriptor's object graph

pub mod cache;
pub mod changes;
pub mod config;
pub mod context;
pub mod diagnostic;
pub mod exec;
pub mod planner;
pub mod project;
pub mod runner;
pub mod target;

pub use cache::{CacheEntry, CacheMap, LintCache};
pub use changes::{collect_changed_files, modified_files};
pub use config::{RelintConfig, Tool};
pub use context::{ContextError, RunContext};
pub use diagnostic::{DiagnosticLine, LintSummary, Severity};
pub use exec::{ExecError, ToolCommand};
pub use planner::{LintPlan, SourceFile};
pub use project::{descriptor_git_roots, DescriptorError, ProjectGraph};
pub use runner::{RunReport, Runner};
pub use target::{Target, TargetKind};

/// Relint version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
