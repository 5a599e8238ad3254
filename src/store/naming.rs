use std::path::{Component, Path, PathBuf};

use super::error::StoreError;

pub const MAX_NAME_LEN: usize = 128;

/// Validate a document name and return the id it maps to.
///
/// Names are limited to 1..=128 chars of `[A-Za-z0-9_-]`, so the mapping to
/// an id is the identity and therefore injective.
pub fn sanitize(name: &str) -> Result<String, StoreError> {
    let valid = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(name.to_string())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

/// Resolve `<root>/<id>.<ext>` and check that it stays directly under `root`.
pub fn resolve(root: &Path, id: &str, ext: &str) -> Result<PathBuf, StoreError> {
    let id = sanitize(id)?;
    let candidate = normalize(&root.join(format!("{id}.{ext}")));
    let root = normalize(root);
    if candidate.parent() != Some(root.as_path()) {
        return Err(StoreError::InvalidName(id));
    }
    Ok(candidate)
}

/// Lexically fold `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
