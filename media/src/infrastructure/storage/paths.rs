use std::path::{Component, Path, PathBuf};

use crate::application::ports::storage_port::StorageError;
use crate::domain::media::extension_policy::is_plain_file_name;

/// Joins a single stored name onto `root`, refusing anything that could
/// escape it.
pub fn resolve_under(root: &Path, stored_name: &str) -> Result<PathBuf, StorageError> {
    if !is_plain_file_name(stored_name) {
        return Err(StorageError::InvalidName(stored_name.to_string()));
    }
    let mut relative = PathBuf::new();
    for component in Path::new(stored_name).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            _ => return Err(StorageError::InvalidName(stored_name.to_string())),
        }
    }
    let full = root.join(relative);
    if !full.starts_with(root) {
        return Err(StorageError::InvalidName(stored_name.to_string()));
    }
    Ok(full)
}

/// Drops `.` components so `./public` and `public` compare equal.
pub fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// `/`-prefixed, `/`-separated path below `public_root`; paths outside the
/// public root are rendered unchanged.
pub fn relative_from_public(public_root: &Path, full: &Path) -> String {
    let (public_root, full) = (without_cur_dir(public_root), without_cur_dir(full));
    match full.strip_prefix(&public_root) {
        Ok(rel) => {
            let parts: Vec<String> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect();
            format!("/{}", parts.join("/"))
        }
        Err(_) => full.to_string_lossy().to_string(),
    }
}
