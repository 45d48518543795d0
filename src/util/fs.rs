//! Filesystem utilities.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Write a script and mark it executable.
#[cfg(unix)]
pub fn write_executable(path: &Path, contents: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    write_string(path, contents)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("failed to set permissions: {}", path.display()))?;
    Ok(path.to_path_buf())
}

/// List every non-directory entry under `root`, relative to `root`.
///
/// Symlinks are not followed; a symlink is listed unless it points at a
/// directory.
pub fn list_files(root: &Path) -> Result<BTreeSet<PathBuf>> {
    let mut listing = BTreeSet::new();

    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        let ty = entry.file_type();
        if ty.is_dir() || (ty.is_symlink() && entry.path().is_dir()) {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("{} escaped {}", entry.path().display(), root.display()))?;
        listing.insert(rel.to_path_buf());
    }

    Ok(listing)
}

/// Create a symlink (platform-aware).
#[cfg(unix)]
pub fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
pub fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        std::os::windows::fs::symlink_dir(src, dst)
    } else {
        std::os::windows::fs::symlink_file(src, dst)
    }
}
