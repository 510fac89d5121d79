//! Diagnostic line handling
//!
//! The orchestrator treats lint output as opaque text except for the path
//! prefix, which is what ties a line back to the file it was reported
//! against. The full `<path>:<line>:<col>: <severity>: <message>` shape is
//! parsed only for display and summary counting.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" | "note" => Ok(Severity::Info),
            _ => Err(()),
        }
    }
}

/// The file-path prefix of a diagnostic line: everything before the first
/// `:`. Returns `None` for lines with no colon or an empty prefix.
pub fn path_prefix(line: &str) -> Option<&str> {
    match line.split_once(':') {
        Some((prefix, _)) if !prefix.is_empty() => Some(prefix),
        _ => None,
    }
}

/// A diagnostic line parsed into its structured parts
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticLine {
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
    pub message: String,
}

impl DiagnosticLine {
    /// Parse a `<path>:<line>:<col>: <severity>: <message>` line.
    ///
    /// Returns `None` for lines that don't match; such lines stay opaque
    /// and are carried through untouched.
    pub fn parse(raw: &str) -> Option<Self> {
        let re = Regex::new(r"^([^:]+):(\d+):(\d+): (error|warning|info|note): (.*)$").ok()?;
        let caps = re.captures(raw)?;

        Some(Self {
            path: PathBuf::from(&caps[1]),
            line: caps[2].parse().ok()?,
            column: caps[3].parse().ok()?,
            severity: caps[4].parse().ok()?,
            message: caps[5].to_string(),
        })
    }
}

/// Severity counts for one run, over both fresh and carried-over output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintSummary {
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    pub files_reprocessed: usize,
    pub files_carried_over: usize,
}

impl LintSummary {
    /// Count severities across diagnostic lines. Lines that don't parse are
    /// ignored for counting purposes.
    pub fn tally<'a>(
        lines: impl IntoIterator<Item = &'a str>,
        files_reprocessed: usize,
        files_carried_over: usize,
    ) -> Self {
        let mut summary = Self {
            files_reprocessed,
            files_carried_over,
            ..Self::default()
        };

        for line in lines {
            match DiagnosticLine::parse(line).map(|d| d.severity) {
                Some(Severity::Error) => summary.errors += 1,
                Some(Severity::Warning) => summary.warnings += 1,
                Some(Severity::Info) => summary.info += 1,
                None => {}
            }
        }

        summary
    }

    /// Check whether diagnostics exceed the configured severity threshold.
    ///
    /// - `"error"` → fail if errors > 0
    /// - `"warning"` → fail if errors or warnings > 0
    /// - `"info"` → fail if any diagnostics
    /// - `"never"` → always pass
    pub fn exceeds_threshold(&self, fail_on: &str) -> bool {
        match fail_on {
            "error" => self.errors > 0,
            "warning" => self.errors > 0 || self.warnings > 0,
            "info" => self.errors > 0 || self.warnings > 0 || self.info > 0,
            "never" => false,
            _ => self.errors > 0, // default to "error" for unknown values
        }
    }
}
