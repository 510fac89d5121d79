//! Configuration file parsing for .relint.toml

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".relint.toml";

/// Main configuration structure for .relint.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelintConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub tool: ToolConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Extensions of files handed to the analysis tool (e.g. [".swift"]).
    /// Empty means no filtering.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Severity threshold for non-zero exit code
    #[serde(default = "default_fail_on")]
    pub fail_on: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Path to the analysis tool binary. Required for a run; can also come
    /// from the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Arguments for the auto-fix invocation
    #[serde(default = "default_fix_args")]
    pub fix_args: Vec<String>,

    /// Arguments for the lint invocation
    #[serde(default = "default_lint_args")]
    pub lint_args: Vec<String>,

    /// Pass `--cache-path <work dir>` so the tool shares the work directory
    #[serde(default = "default_true")]
    pub pass_cache_path: bool,
}

// Default functions
fn default_fail_on() -> String {
    "error".to_string()
}

fn default_fix_args() -> Vec<String> {
    vec!["--fix".to_string(), "--quiet".to_string()]
}

fn default_lint_args() -> Vec<String> {
    vec![
        "--quiet".to_string(),
        "--force-exclude".to_string(),
        "--reporter".to_string(),
        "xcode".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

impl Default for RelintConfig {
    fn default() -> Self {
        toml::from_str("").expect("empty TOML should parse to defaults")
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            extensions: Vec::new(),
            fail_on: default_fail_on(),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            path: None,
            fix_args: default_fix_args(),
            lint_args: default_lint_args(),
            pass_cache_path: true,
        }
    }
}

/// A fully-resolved analysis tool ready for command planning
#[derive(Debug, Clone)]
pub struct Tool {
    pub path: PathBuf,
    pub fix_args: Vec<String>,
    pub lint_args: Vec<String>,
    pub pass_cache_path: bool,
}

impl RelintConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: RelintConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Find and load .relint.toml from the given directory or ancestors
    pub fn find_and_load(start_dir: &Path) -> Result<Self> {
        let mut current = start_dir;

        loop {
            let config_path = current.join(CONFIG_FILE);
            if config_path.exists() {
                return Self::from_file(&config_path);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        // No config found, use defaults
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Resolve the analysis tool, preferring an explicit override over the
    /// configured path. No tool at all is a startup error — the pipeline
    /// must not begin with an unverified environment.
    pub fn resolved_tool(&self, override_path: Option<&Path>) -> Result<Tool> {
        let path = match override_path {
            Some(p) => p.to_path_buf(),
            None => match &self.tool.path {
                Some(p) => p.clone(),
                None => bail!(
                    "no analysis tool configured; set [tool] path in {CONFIG_FILE} or pass --tool"
                ),
            },
        };

        Ok(Tool {
            path,
            fix_args: self.tool.fix_args.clone(),
            lint_args: self.tool.lint_args.clone(),
            pass_cache_path: self.tool.pass_cache_path,
        })
    }
}
