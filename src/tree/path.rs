//! Vault-relative path handling.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Express `path` relative to `root` as forward-slash separated segments.
///
/// Segments keep their on-disk text, so distinct names never collapse into
/// one relative path. Returns `None` when `path` is not under `root` or a
/// segment is not valid UTF-8. The root itself maps to the empty string.
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut segments: Vec<&str> = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_str()?),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(segments.join("/"))
}

/// Resolve the vault root to an absolute directory path.
///
/// Uses `dunce` so Windows roots stay in their familiar non-UNC form. A root
/// that exists but is not a directory is rejected.
pub fn resolve_vault_root(root: &Path) -> io::Result<PathBuf> {
    let resolved = dunce::canonicalize(root)?;
    if !std::fs::metadata(&resolved)?.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a directory", resolved.display()),
        ));
    }
    Ok(resolved)
}
