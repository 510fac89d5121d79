//! Project descriptor graph and source path resolution
//!
//! The IDE project descriptor is a keyed object graph: groups, variant
//! groups and file references, each with a relative name and at most one
//! parent. Resolution walks parent links to the root, memoizing per key so
//! resolving every leaf of a deep tree stays near-linear instead of
//! O(nodes × depth).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// Error types for descriptor decoding and resolution
#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("failed to read project descriptor {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode project descriptor {path}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unknown object key `{key}`")]
    UnknownKey { key: String },

    #[error("parent cycle detected while resolving object `{key}`")]
    ParentCycle { key: String },
}

/// Kinds of descriptor objects that participate in path resolution.
/// Anything else in the document is not indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Group,
    VariantGroup,
    FileReference,
}

impl ObjectKind {
    fn from_isa(isa: &str) -> Option<Self> {
        match isa {
            "group" => Some(ObjectKind::Group),
            "variant-group" => Some(ObjectKind::VariantGroup),
            "file-reference" => Some(ObjectKind::FileReference),
            _ => None,
        }
    }
}

/// One indexed node of the object graph
#[derive(Debug, Clone)]
pub struct ProjectObject {
    pub kind: ObjectKind,
    pub name: String,
}

#[derive(Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    objects: HashMap<String, RawObject>,
}

#[derive(Deserialize)]
struct RawObject {
    isa: String,

    #[serde(default)]
    path: Option<String>,

    #[serde(default)]
    children: Vec<String>,
}

/// The indexed object graph of one project descriptor
pub struct ProjectGraph {
    objects: HashMap<String, ProjectObject>,
    parents: HashMap<String, String>,
    path_cache: RefCell<HashMap<String, PathBuf>>,
}

impl ProjectGraph {
    /// Load and index a descriptor document. Decode failures are fatal —
    /// a run must not proceed against a project it cannot read.
    pub fn load(descriptor: &Path) -> Result<Self, DescriptorError> {
        let contents = fs::read_to_string(descriptor).map_err(|source| DescriptorError::Read {
            path: descriptor.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents).map_err(|source| DescriptorError::Decode {
            path: descriptor.to_path_buf(),
            source,
        })
    }

    /// Index a descriptor from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawDescriptor = serde_json::from_str(json)?;

        let mut objects = HashMap::new();
        let mut parents = HashMap::new();

        for (key, object) in raw.objects {
            let Some(kind) = ObjectKind::from_isa(&object.isa) else {
                continue;
            };
            let Some(name) = object.path else {
                continue;
            };

            for child in &object.children {
                parents.insert(child.clone(), key.clone());
            }
            objects.insert(key, ProjectObject { kind, name });
        }

        Ok(Self {
            objects,
            parents,
            path_cache: RefCell::new(HashMap::new()),
        })
    }

    pub fn object(&self, key: &str) -> Option<&ProjectObject> {
        self.objects.get(key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Absolute path of an object: names that already carry a directory
    /// component are used verbatim, everything else resolves against the
    /// object's ancestry; relative results are joined onto `project_dir`.
    pub fn path_of(&self, key: &str, project_dir: &Path) -> Result<PathBuf, DescriptorError> {
        let object = self
            .objects
            .get(key)
            .ok_or_else(|| DescriptorError::UnknownKey {
                key: key.to_string(),
            })?;

        let path = if object.name.contains('/') {
            PathBuf::from(&object.name)
        } else {
            self.relative_path(key)?
        };

        Ok(if path.is_absolute() {
            path
        } else {
            project_dir.join(path)
        })
    }

    /// Path of an object relative to the project root, accumulated from its
    /// ancestry. Memoized per key; a resolved ancestor short-circuits the
    /// rest of the walk, so resolving all leaves amortizes to O(1) per
    /// query after the first full-depth walk.
    fn relative_path(&self, key: &str) -> Result<PathBuf, DescriptorError> {
        if let Some(cached) = self.path_cache.borrow().get(key) {
            return Ok(cached.clone());
        }

        let object = self
            .objects
            .get(key)
            .ok_or_else(|| DescriptorError::UnknownKey {
                key: key.to_string(),
            })?;

        let mut path = PathBuf::from(&object.name);
        let mut current = key;
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(key);

        while let Some(parent_key) = self.parents.get(current) {
            if !visited.insert(parent_key.as_str()) {
                return Err(DescriptorError::ParentCycle {
                    key: key.to_string(),
                });
            }

            if let Some(cached) = self.path_cache.borrow().get(parent_key.as_str()) {
                path = cached.join(path);
                break;
            }

            // a declared parent that isn't indexed makes this node a root
            let Some(parent) = self.objects.get(parent_key) else {
                break;
            };

            path = Path::new(&parent.name).join(path);
            current = parent_key.as_str();
        }

        self.path_cache
            .borrow_mut()
            .insert(key.to_string(), path.clone());
        Ok(path)
    }

    /// Version-control roots referenced by the project: file-reference
    /// nodes resolving to directories that contain `.git`, plus the repo
    /// root itself when known. Sorted and deduplicated.
    pub fn git_root_folders(
        &self,
        project_dir: &Path,
        repo_root: Option<&Path>,
    ) -> Result<Vec<PathBuf>, DescriptorError> {
        let mut roots = Vec::new();

        for (key, object) in &self.objects {
            if object.kind != ObjectKind::FileReference {
                continue;
            }
            let path = self.path_of(key, project_dir)?;
            if path.is_dir() && path.join(".git").exists() {
                roots.push(path);
            }
        }

        if let Some(root) = repo_root {
            roots.push(root.to_path_buf());
        }

        roots.sort();
        roots.dedup();
        Ok(roots)
    }
}

/// Cached version-control roots, keyed by the descriptor's modification
/// timestamp so the object graph is only re-parsed when the project
/// actually changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCache {
    pub descriptor_modified: SystemTime,
    pub git_roots: Vec<PathBuf>,
}

impl ProjectCache {
    /// Load cached roots if the stored timestamp matches. Missing or
    /// corrupt cache documents simply miss.
    pub fn load(path: &Path, descriptor_modified: SystemTime) -> Option<Vec<PathBuf>> {
        let cache: ProjectCache = fs::read(path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())?;

        (cache.descriptor_modified == descriptor_modified).then_some(cache.git_roots)
    }

    pub fn save(path: &Path, descriptor_modified: SystemTime, git_roots: &[PathBuf]) -> Result<()> {
        let cache = ProjectCache {
            descriptor_modified,
            git_roots: git_roots.to_vec(),
        };
        let json = serde_json::to_string_pretty(&cache).context("serializing project cache")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

/// Version-control roots for a descriptor, served from the project cache
/// when its modification timestamp is unchanged.
pub fn descriptor_git_roots(
    descriptor: &Path,
    project_dir: &Path,
    repo_root: Option<&Path>,
    cache_path: &Path,
) -> Result<Vec<PathBuf>> {
    let descriptor_modified = fs::metadata(descriptor)
        .and_then(|m| m.modified())
        .with_context(|| format!("reading {}", descriptor.display()))?;

    if let Some(roots) = ProjectCache::load(cache_path, descriptor_modified) {
        return Ok(roots);
    }

    let graph = ProjectGraph::load(descriptor)?;
    let roots = graph.git_root_folders(project_dir, repo_root)?;

    ProjectCache::save(cache_path, descriptor_modified, &roots)?;

    Ok(roots)
}
