//! Filesystem helpers shared by the store: atomic writes, staging and
//! recursive copies, all reporting errors through [`ThemeError::from_io`].

use crate::error::{Result, ThemeError};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Write `contents` to `path` via a temp file in the same directory and a
/// rename, so readers never see a truncated file.
pub(crate) fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(ThemeError::io(parent))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(ThemeError::io(parent))?;
    tmp.write_all(contents).map_err(ThemeError::io(path))?;
    tmp.as_file().sync_all().map_err(ThemeError::io(path))?;
    tmp.persist(path)
        .map_err(|e| ThemeError::from_io(path, e.error))?;
    Ok(())
}

/// Serialize `value` as pretty JSON (trailing newline) and write it atomically.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value).map_err(|e| ThemeError::Io {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    text.push('\n');
    atomic_write(path, text.as_bytes())
}

/// Create a hidden, uniquely named staging directory inside `root`.
///
/// The caller fills it and renames it into place; dropping the returned
/// guard without calling [`StagingDir::commit`] removes it.
pub(crate) fn staging_dir(root: &Path, label: &str) -> Result<StagingDir> {
    fs::create_dir_all(root).map_err(ThemeError::io(root))?;
    let dir = tempfile::Builder::new()
        .prefix(&format!(".staging-{label}-"))
        .tempdir_in(root)
        .map_err(ThemeError::io(root))?;
    Ok(StagingDir { dir: Some(dir) })
}

/// A staging directory that is removed unless committed.
#[derive(Debug)]
pub(crate) struct StagingDir {
    dir: Option<tempfile::TempDir>,
}

impl StagingDir {
    pub(crate) fn path(&self) -> &Path {
        self.dir
            .as_ref()
            .map_or_else(|| Path::new(""), tempfile::TempDir::path)
    }

    /// Rename the staged directory to `dest`. `dest` must not exist.
    pub(crate) fn commit(mut self, dest: &Path) -> Result<()> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };
        let staged: PathBuf = dir.into_path();
        if let Err(e) = fs::rename(&staged, dest) {
            let _ = fs::remove_dir_all(&staged);
            return Err(ThemeError::from_io(dest, e));
        }
        Ok(())
    }
}

/// Copy the directory tree at `src` into `dest` (created if missing).
pub(crate) fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            ThemeError::from_io(&path, e.into())
        })?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| ThemeError::Validation(format!("bad path {}", entry.path().display())))?;
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(ThemeError::io(&target))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).map_err(ThemeError::io(&target))?;
        }
    }
    Ok(())
}

/// Remove `path` whether it is a file, a symlink or a directory tree.
/// A missing path is not an error.
pub(crate) fn remove_any(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).map_err(ThemeError::io(path)),
        Ok(_) => fs::remove_file(path).map_err(ThemeError::io(path)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ThemeError::from_io(path, e)),
    }
}
