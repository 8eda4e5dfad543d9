//! The registry of files that belong to a deployment project

pub mod error;
pub mod paths;
mod scanner;

pub use error::ProjectFileError;
pub use scanner::{IGNORE_FILE_NAME, scan_project};

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Capability handed to per-API validators for dereferencing file references
pub trait ProjectFileResolver {
    /// Directory that relative names resolve against; no reference may leave it
    fn base_dir(&self) -> &Path;

    /// Every registered path, in registration order
    fn get_all_paths(&self) -> &[PathBuf];

    /// Resolve `name` to the absolute form used for membership checks
    fn resolve_path(&self, name: &str) -> PathBuf;

    /// Read a file that belongs to the project
    fn get_file(&self, name: &str) -> Result<Vec<u8>, ProjectFileError>;
}

/// Immutable set of absolute paths that make up a project.
///
/// Lookups resolve the requested name against `base_dir` and compare the
/// normalized result against the registered paths. Nothing outside the set is
/// ever read, even if it exists on disk.
#[derive(Debug, Clone)]
pub struct ProjectFileSet {
    base_dir: PathBuf,
    paths: Vec<PathBuf>,
    index: HashSet<PathBuf>,
}

impl ProjectFileSet {
    /// Build a file set whose relative names resolve against the working directory
    pub fn new<I, P>(files: I) -> Result<Self, ProjectFileError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let cwd = std::env::current_dir().map_err(ProjectFileError::WorkingDirectory)?;
        Ok(Self::with_base_dir(cwd, files))
    }

    /// Build a file set whose relative names resolve against `base_dir`
    pub fn with_base_dir<I, P>(base_dir: impl Into<PathBuf>, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let base_dir = base_dir.into();
        let mut ordered = Vec::new();
        let mut index = HashSet::new();

        for path in files {
            let absolute = paths::absolute_path(&base_dir, path);
            if index.insert(absolute.clone()) {
                ordered.push(absolute);
            }
        }

        Self {
            base_dir,
            paths: ordered,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(&self.resolve_path(name))
    }

    /// SHA-256 over every file's base-relative path and contents, hex encoded.
    ///
    /// Identical projects produce identical digests regardless of where they
    /// are checked out.
    pub fn digest(&self) -> Result<String, ProjectFileError> {
        let mut sorted: Vec<&PathBuf> = self.paths.iter().collect();
        sorted.sort();

        let mut aggregate = Sha256::new();
        for path in sorted {
            let bytes = read_bytes(path)?;
            let relative = path.strip_prefix(&self.base_dir).unwrap_or(path);
            aggregate.update(relative.to_string_lossy().as_bytes());
            aggregate.update([0u8]);
            aggregate.update(Sha256::digest(&bytes));
        }

        Ok(hex::encode(aggregate.finalize()))
    }
}

impl ProjectFileResolver for ProjectFileSet {
    fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn get_all_paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn resolve_path(&self, name: &str) -> PathBuf {
        paths::absolute_path(&self.base_dir, name)
    }

    fn get_file(&self, name: &str) -> Result<Vec<u8>, ProjectFileError> {
        let absolute = self.resolve_path(name);

        // Membership first: only registered paths are ever read
        if !self.index.contains(&absolute) {
            debug!("Rejected reference outside project: {}", absolute.display());
            return Err(ProjectFileError::FileNotInProject {
                name: name.to_string(),
            });
        }

        read_bytes(&absolute)
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ProjectFileError> {
    std::fs::read(path).map_err(|source| ProjectFileError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}
