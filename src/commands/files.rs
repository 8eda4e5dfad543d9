use anyhow::Result;
use apigate::project::ProjectFileResolver;
use std::path::Path;

pub fn files_command(project: &Path) -> Result<()> {
    let file_set = super::scan(project)?;

    println!("Project files in {}:", file_set.base_dir().display());
    if file_set.is_empty() {
        println!("  (none)");
    }
    for path in file_set.get_all_paths() {
        let relative = path.strip_prefix(file_set.base_dir()).unwrap_or(path);
        println!("  - {}", relative.display());
    }

    println!("\n{} files, digest {}", file_set.len(), file_set.digest()?);
    Ok(())
}
