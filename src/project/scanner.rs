//! Discovers the files that make up a project directory

use globwalk::{FileType, GlobWalkerBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::ProjectFileSet;
use super::error::ProjectFileError;

/// Optional file in the project root listing glob patterns to exclude
pub const IGNORE_FILE_NAME: &str = ".apiignore";

const DEFAULT_EXCLUDES: [&str; 3] = [".git/**", "**/__pycache__/**", "**/*.pyc"];

/// Walk `root` and register every file that is not excluded.
///
/// The root is canonicalized first, so relative references in declarations
/// resolve against the real project directory.
pub fn scan_project(root: &Path) -> Result<ProjectFileSet, ProjectFileError> {
    let root = std::fs::canonicalize(root).map_err(|source| ProjectFileError::FileRead {
        path: root.to_path_buf(),
        source,
    })?;

    let mut patterns = vec!["**".to_string()];
    patterns.extend(DEFAULT_EXCLUDES.iter().map(|p| format!("!{p}")));
    patterns.extend(read_ignore_patterns(&root)?);

    let walker = GlobWalkerBuilder::from_patterns(&root, patterns.as_slice())
        .file_type(FileType::FILE)
        .follow_links(false)
        .build()
        .map_err(|e| ProjectFileError::Scan {
            root: root.clone(),
            message: e.to_string(),
        })?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| ProjectFileError::Scan {
            root: root.clone(),
            message: e.to_string(),
        })?;
        files.push(entry.path().to_path_buf());
    }
    files.sort();

    debug!("Found {} project files in {}", files.len(), root.display());
    Ok(ProjectFileSet::with_base_dir(root, files))
}

/// Exclusion patterns from the ignore file, already negated for the walker.
///
/// Lines keep gitignore semantics: a leading `/` anchors to the root and a
/// trailing `/` matches directories at any depth.
fn read_ignore_patterns(root: &Path) -> Result<Vec<String>, ProjectFileError> {
    let ignore_path = root.join(IGNORE_FILE_NAME);
    if !ignore_path.is_file() {
        return Ok(Vec::new());
    }

    let content =
        std::fs::read_to_string(&ignore_path).map_err(|source| ProjectFileError::FileRead {
            path: ignore_path.clone(),
            source,
        })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.strip_prefix('!') {
            // Re-included paths are whitelisted again
            Some(kept) => kept.to_string(),
            None => format!("!{line}"),
        })
        .collect())
}
