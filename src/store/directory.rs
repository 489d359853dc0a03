//! # Theme Directories
//!
//! A Theme Directory is `theme.json` plus one generated file per
//! integration, optionally with a `wallpapers/` sub-directory.
//!
//! Loading is fail-soft: a directory whose `theme.json` is missing or
//! corrupt yields `None` with a warning, so one bad entry never breaks a
//! listing. Writing is fail-closed: every generator runs before anything
//! touches the disk.

use super::fs::{atomic_write, staging_dir};
use crate::error::{Result, ThemeError};
use crate::generate::generate_all;
use crate::theme::{ThemeMetadata, THEME_FILE};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Sub-directory holding optional wallpaper images.
pub const WALLPAPERS_DIR: &str = "wallpapers";

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "heic", "webp", "gif", "tiff", "bmp"];

/// Which root a Theme Directory lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeOrigin {
    Bundled,
    Custom,
}

/// A theme found on disk.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeEntry {
    /// Directory name; the identity used by apply/update/delete.
    pub slug: String,
    pub path: PathBuf,
    pub metadata: ThemeMetadata,
    pub origin: ThemeOrigin,
    pub is_custom: bool,
    pub is_light: bool,
}

/// Read `<dir>/theme.json`, returning `None` (and logging) when it is absent
/// or unparsable.
pub fn load_theme(dir: &Path) -> Option<ThemeMetadata> {
    let file = dir.join(THEME_FILE);
    let text = match fs::read_to_string(&file) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %file.display(), error = %e, "Skipping theme without readable theme.json");
            return None;
        }
    };
    match ThemeMetadata::from_json(&text) {
        Ok(meta) => Some(meta),
        Err(e) => {
            tracing::warn!(path = %file.display(), error = %e, "Skipping theme with invalid theme.json");
            None
        }
    }
}

/// List every loadable theme under `root`, sorted by slug.
pub fn list_root(root: &Path, origin: ThemeOrigin) -> Vec<ThemeEntry> {
    let read = match fs::read_dir(root) {
        Ok(read) => read,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %root.display(), error = %e, "Failed to read theme root");
            }
            return Vec::new();
        }
    };

    let mut entries: Vec<ThemeEntry> = read
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read directory entry");
                None
            }
        })
        .filter_map(|entry| {
            let slug = entry.file_name().to_str()?.to_string();
            if slug.starts_with('.') || !entry.path().is_dir() {
                return None;
            }
            let metadata = load_theme(&entry.path())?;
            Some(ThemeEntry {
                is_light: metadata.is_light(),
                is_custom: origin == ThemeOrigin::Custom,
                slug,
                path: entry.path(),
                metadata,
                origin,
            })
        })
        .collect();

    entries.sort_by(|a, b| a.slug.cmp(&b.slug));
    entries
}

/// Write `theme.json` and every generated file into `dir` (which must exist).
pub fn write_contents(dir: &Path, meta: &ThemeMetadata) -> Result<()> {
    // Render everything first so a generator failure writes nothing.
    let files = generate_all(meta)?;
    let theme_json = meta.to_json()?;

    atomic_write(&dir.join(THEME_FILE), theme_json.as_bytes())?;
    for file in files {
        let path = dir.join(file.file_name);
        atomic_write(&path, file.contents.as_bytes())?;
        tracing::debug!(path = %path.display(), integration = file.integration.id(), "Wrote generated config");
    }
    Ok(())
}

/// Render generated files that are absent from `dir`, leaving existing ones
/// untouched. Used when importing archives that only carry `theme.json`.
pub fn write_missing(dir: &Path, meta: &ThemeMetadata) -> Result<()> {
    for file in generate_all(meta)? {
        let path = dir.join(file.file_name);
        if !path.exists() {
            atomic_write(&path, file.contents.as_bytes())?;
            tracing::debug!(path = %path.display(), integration = file.integration.id(), "Filled in missing config");
        }
    }
    Ok(())
}

/// Build a complete Theme Directory for `meta` at `dest`, staging it in
/// `root` first. Nothing appears at `dest` unless every write succeeded.
pub fn create_at(root: &Path, dest: &Path, meta: &ThemeMetadata) -> Result<()> {
    let staging = staging_dir(root, &meta.slug())?;
    write_contents(staging.path(), meta)?;
    staging.commit(dest)
}

/// Regenerate the Theme Directory at `dest` from scratch, keeping only its
/// `wallpapers/` sub-directory. Stale generated files do not survive.
pub fn regenerate(root: &Path, dest: &Path, meta: &ThemeMetadata) -> Result<()> {
    let staging = staging_dir(root, &meta.slug())?;
    write_contents(staging.path(), meta)?;

    let wallpapers = dest.join(WALLPAPERS_DIR);
    if wallpapers.is_dir() {
        super::fs::copy_dir(&wallpapers, &staging.path().join(WALLPAPERS_DIR))?;
    }

    // Move the old directory aside, swap the new one in, then drop the old one.
    let backup = staging_dir(root, "old")?;
    let backup_path = backup.path().join("theme");
    fs::rename(dest, &backup_path).map_err(ThemeError::io(dest))?;
    if let Err(e) = staging.commit(dest) {
        // put the original back
        let _ = fs::rename(&backup_path, dest);
        return Err(e);
    }
    drop(backup);
    Ok(())
}

/// The first wallpaper image in `dir`, by file name.
pub fn first_wallpaper(dir: &Path) -> Option<PathBuf> {
    let read = fs::read_dir(dir.join(WALLPAPERS_DIR)).ok()?;
    let mut images: Vec<PathBuf> = read
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    images.sort();
    images.into_iter().next()
}
