mod files;
mod validate;

pub use files::files_command;
pub use validate::validate_command;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the configuration file; relative paths are taken from the project root
fn resolve_config_path(project: &Path, config: &Path) -> PathBuf {
    if config.is_absolute() {
        config.to_path_buf()
    } else {
        project.join(config)
    }
}

fn scan(project: &Path) -> Result<apigate::project::ProjectFileSet> {
    apigate::project::scan_project(project)
        .with_context(|| format!("Failed to collect project files in {}", project.display()))
}
