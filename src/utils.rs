use std::path::{Component, Path, PathBuf};

/// Normalizes a manifest path into a clean relative path.
///
/// `.` segments and repeated separators are dropped. Returns `None` when the
/// path is empty after normalization, absolute, or climbs out with `..`.
pub fn normalize_relative(raw: &str) -> Option<PathBuf> {
    let mut new_path = PathBuf::new();

    for component in Path::new(raw).components() {
        match component {
            Component::CurDir => {}

            Component::Normal(segment) => new_path.push(segment),

            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if new_path.as_os_str().is_empty() {
        None
    } else {
        Some(new_path)
    }
}

/// Returns the first ancestor of `path` (itself included) that exists and is
/// not a directory.
pub fn blocking_ancestor(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .filter(|ancestor| !ancestor.as_os_str().is_empty())
        .find(|ancestor| {
            std::fs::symlink_metadata(ancestor)
                .map(|meta| !meta.is_dir() && !ancestor.is_dir())
                .unwrap_or(false)
        })
        .map(Path::to_path_buf)
}
