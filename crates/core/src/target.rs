//! Build target descriptions handed to the runner
//!
//! A target is either real (described by the project, with a declared
//! product kind) or synthetic (assembled from change detection in standalone
//! mode). Both expose the same read-only surface.

use std::path::{Path, PathBuf};

/// What a target produces, as far as linting cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Main,
    Test,
}

impl TargetKind {
    /// Derive the kind from a product-type string
    pub fn from_product_type(product_type: &str) -> Self {
        if product_type.ends_with("test") || product_type.ends_with("testing") {
            TargetKind::Test
        } else {
            TargetKind::Main
        }
    }
}

/// A build target and its input files
#[derive(Debug, Clone)]
pub enum Target {
    /// A target declared by the project descriptor
    Real {
        name: String,
        kind: TargetKind,
        files: Vec<PathBuf>,
    },

    /// A target assembled on the fly, e.g. from changed files
    Synthetic { name: String, files: Vec<PathBuf> },
}

impl Target {
    pub fn synthetic(name: impl Into<String>, files: Vec<PathBuf>) -> Self {
        Target::Synthetic {
            name: name.into(),
            files,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Target::Real { name, .. } | Target::Synthetic { name, .. } => name,
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Real { kind, .. } => *kind,
            Target::Synthetic { .. } => TargetKind::Main,
        }
    }

    pub fn input_files(&self) -> &[PathBuf] {
        match self {
            Target::Real { files, .. } | Target::Synthetic { files, .. } => files,
        }
    }

    /// Input files filtered to the given extensions (with leading dot, e.g.
    /// ".swift"). An empty extension list keeps everything.
    pub fn source_files_with_extensions(&self, extensions: &[String]) -> Vec<PathBuf> {
        self.input_files()
            .iter()
            .filter(|path| matches_extensions(path, extensions))
            .cloned()
            .collect()
    }
}

fn matches_extensions(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e,
        None => return false,
    };
    let with_dot = format!(".{}", ext);
    extensions.iter().any(|e| e == &with_dot)
}
