//! Lexical path resolution shared by the project file set and its callers

use std::path::{Component, Path, PathBuf};

/// Resolve `name` against `base` and normalize it.
///
/// Normalization is purely lexical: `.` segments are dropped and `..` pops the
/// previous segment (never above the root). Symlinks are not followed, so the
/// result is stable whether or not the file exists.
pub fn absolute_path(base: &Path, name: impl AsRef<Path>) -> PathBuf {
    let name = name.as_ref();
    let joined = if name.is_absolute() {
        name.to_path_buf()
    } else {
        base.join(name)
    };
    clean(&joined)
}

fn clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => cleaned.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // pop() on a bare root is a no-op, which keeps us inside it
                cleaned.pop();
            }
            Component::Normal(segment) => cleaned.push(segment),
        }
    }
    cleaned
}
