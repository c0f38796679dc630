//! Crash-safe file replacement and removal.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::models::error::StorageError;

/// Replace `path` with `contents` and make the result durable.
///
/// Writes a sibling temporary file, syncs it, renames it over `path` and
/// syncs the parent directory. A crash at any point leaves either the old
/// file or the new one, never a truncated mix.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let parent = parent_dir(path);
    fs::create_dir_all(&parent).map_err(|source| StorageError::CreateDir {
        path: parent.clone(),
        source,
    })?;

    let tmp_path = temp_path(path);
    let write = |file: &mut File| -> io::Result<()> {
        file.write_all(contents)?;
        file.flush()
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)
        .map_err(|source| StorageError::Write {
            path: tmp_path.clone(),
            source,
        })?;
    write(&mut file).map_err(|source| StorageError::Write {
        path: tmp_path.clone(),
        source,
    })?;
    file.sync_all().map_err(|source| StorageError::Sync {
        path: tmp_path.clone(),
        source,
    })?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|source| {
        fs::remove_file(&tmp_path).ok();
        StorageError::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;

    sync_dir(&parent)
}

/// Remove `path` if present and make the removal durable.
///
/// Returns `Ok(false)` when there was nothing to remove.
pub fn remove_durable(path: &Path) -> Result<bool, StorageError> {
    match fs::remove_file(path) {
        Ok(()) => {
            sync_dir(&parent_dir(path))?;
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(StorageError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Flush a directory's entries (creations, renames, unlinks) to disk.
pub fn sync_dir(dir: &Path) -> Result<(), StorageError> {
    File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(|source| StorageError::Sync {
            path: dir.to_path_buf(),
            source,
        })
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
