//! Blocking I/O helpers: atomic writes with locking, directory listing and
//! recursive tree copy/delete.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Replace `path` with `content` in one step.
///
/// The bytes go to a locked sibling temp file that is synced and then
/// renamed over the target, so readers see either the old file or the new
/// one. Missing parent directories are created.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let target = path.to_native();
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp = temp_sibling(&target);
    let locked = |_: std::io::Error| Error::LockFailed {
        path: target.clone(),
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp)
        .map_err(|e| Error::io(&temp, e))?;
    file.lock_exclusive().map_err(locked)?;
    file.write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| Error::io(&temp, e))?;
    file.unlock().map_err(locked)?;
    drop(file);

    fs::rename(&temp, &target).map_err(|e| Error::io(&target, e))
}

/// `.<name>.<pid>.tmp` next to `target`, on the same filesystem.
fn temp_sibling(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Remove a single file. Returns `false` when there was nothing to remove.
pub fn remove_file_if_exists(path: &NormalizedPath) -> Result<bool> {
    let native_path = path.to_native();
    match fs::remove_file(&native_path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(&native_path, e)),
    }
}

/// List the immediate subdirectories of `path` as `(name, path)` pairs.
///
/// Entries that are not directories are skipped; symlinks to directories
/// count as directories. The order follows the filesystem and is not sorted.
pub fn list_dirs(path: &NormalizedPath) -> Result<Vec<(String, NormalizedPath)>> {
    let native_path = path.to_native();
    let entries = fs::read_dir(&native_path).map_err(|e| Error::io(&native_path, e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&native_path, e))?;
        let entry_path = entry.path();
        if !entry_path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        dirs.push((name, NormalizedPath::dir(&entry_path)));
    }

    Ok(dirs)
}

/// Recursively copy the contents of `source` into `dest`.
///
/// `dest` and any missing parents are created. Existing files in `dest` are
/// overwritten. Stops at the first failure, leaving whatever was already
/// copied in place.
///
/// Returns the number of files copied.
pub fn copy_dir_all(source: &Path, dest: &Path) -> Result<usize> {
    fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;

    let entries = fs::read_dir(source).map_err(|e| Error::io(source, e))?;
    let mut copied = 0;

    for entry in entries {
        let entry = entry.map_err(|e| Error::io(source, e))?;
        let from = entry.path();
        let to = dest.join(entry.file_name());

        if from.is_dir() {
            copied += copy_dir_all(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| Error::io(&from, e))?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Recursively delete `path`. Returns `false` when it did not exist.
pub fn remove_dir_all(path: &Path) -> Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}
