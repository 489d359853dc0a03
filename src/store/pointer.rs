//! # Current-Theme Pointer
//!
//! The active theme is the target of the `current/theme` symlink. A parallel
//! `state.json` records the slug, the switch time and the wallpaper in use:
//!
//! ```json
//! { "currentTheme": "nord", "lastSwitched": 1760000000000, "currentWallpaper": null }
//! ```
//!
//! The symlink is authoritative. It is swapped by creating a fresh link
//! under a temporary name and renaming it over the old one, so concurrent
//! readers see either the old or the new theme, never a missing pointer.

use super::directory::load_theme;
use super::fs::{remove_any, write_json};
use crate::error::{Result, ThemeError};
use crate::theme::ThemeMetadata;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `state.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeState {
    pub current_theme: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub last_switched: Option<i64>,
    pub current_wallpaper: Option<String>,
}

impl ThemeState {
    /// Load `state.json`; a missing or corrupt file reads as the empty state.
    pub fn load(path: &Path) -> Self {
        let Ok(text) = fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt state file");
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

/// The theme the pointer currently resolves to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTheme {
    pub slug: String,
    pub path: PathBuf,
    pub metadata: ThemeMetadata,
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

/// Point `pointer` at `target`.
///
/// A legacy plain directory at `pointer` is removed first; a symlink (live or
/// broken) or file is replaced in a single rename. A relative `target` is
/// made absolute against the working directory.
pub fn swap(pointer: &Path, target: &Path) -> Result<()> {
    let target = std::path::absolute(target).map_err(ThemeError::io(target))?;
    let parent = pointer
        .parent()
        .ok_or_else(|| ThemeError::Validation(format!("bad pointer path {}", pointer.display())))?;
    fs::create_dir_all(parent).map_err(ThemeError::io(parent))?;

    if let Ok(meta) = fs::symlink_metadata(pointer) {
        if meta.is_dir() {
            tracing::warn!(path = %pointer.display(), "Replacing plain directory at theme pointer");
            fs::remove_dir_all(pointer).map_err(ThemeError::io(pointer))?;
        }
    }

    let tmp = parent.join(format!(
        ".theme-{}-{}",
        std::process::id(),
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));
    make_symlink(&target, &tmp).map_err(ThemeError::io(parent))?;
    if let Err(e) = fs::rename(&tmp, pointer) {
        let _ = remove_any(&tmp);
        return Err(ThemeError::from_io(pointer, e));
    }
    Ok(())
}

/// Dereference the pointer. Absent, broken or non-theme targets all read as
/// "no active theme".
pub fn resolve(pointer: &Path) -> Option<CurrentTheme> {
    let target = fs::read_link(pointer).ok()?;
    let target = if target.is_relative() {
        pointer.parent()?.join(target)
    } else {
        target
    };
    if !target.is_dir() {
        tracing::debug!(path = %pointer.display(), "Theme pointer is broken");
        return None;
    }
    let metadata = load_theme(&target)?;
    let slug = target.file_name()?.to_str()?.to_string();
    Some(CurrentTheme {
        slug,
        path: target,
        metadata,
    })
}

/// The slug the pointer names, even if the target has since been damaged.
pub fn target_slug(pointer: &Path) -> Option<String> {
    let target = fs::read_link(pointer).ok()?;
    Some(target.file_name()?.to_str()?.to_string())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::store::directory::create_at;
    use tempfile::TempDir;

    fn fixture() -> ThemeMetadata {
        ThemeMetadata::from_json(include_str!("../../tests/fixtures/midnight.json"))
            .expect("fixture parses")
    }

    fn theme_dir(temp: &TempDir, slug: &str) -> PathBuf {
        let dest = temp.path().join("custom").join(slug);
        create_at(&temp.path().join("custom"), &dest, &fixture()).unwrap();
        dest
    }

    #[test]
    fn test_swap_and_resolve() {
        let temp = TempDir::new().unwrap();
        let a = theme_dir(&temp, "a");
        let b = theme_dir(&temp, "b");
        let pointer = temp.path().join("current").join("theme");

        assert!(resolve(&pointer).is_none());
        swap(&pointer, &a).unwrap();
        assert_eq!(resolve(&pointer).unwrap().slug, "a");
        swap(&pointer, &b).unwrap();
        assert_eq!(resolve(&pointer).unwrap().slug, "b");

        let entries: Vec<_> = fs::read_dir(pointer.parent().unwrap())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .collect();
        assert_eq!(entries.len(), 1, "only the pointer remains");
        assert!(fs::symlink_metadata(&pointer).unwrap().file_type().is_symlink());
    }

    #[test]
    fn test_swap_replaces_plain_directory() {
        let temp = TempDir::new().unwrap();
        let a = theme_dir(&temp, "a");
        let pointer = temp.path().join("current").join("theme");
        fs::create_dir_all(pointer.join("junk")).unwrap();

        swap(&pointer, &a).unwrap();
        assert!(fs::symlink_metadata(&pointer).unwrap().file_type().is_symlink());
        assert_eq!(resolve(&pointer).unwrap().slug, "a");
    }

    #[test]
    fn test_swap_stores_absolute_target() {
        let temp = TempDir::new().unwrap();
        let a = theme_dir(&temp, "a");
        let pointer = temp.path().join("current").join("theme");

        // the same directory, spelled relative to the working directory
        let cwd = std::env::current_dir().unwrap();
        let mut relative = PathBuf::new();
        for _ in cwd.components().skip(1) {
            relative.push("..");
        }
        relative.push(a.strip_prefix("/").unwrap());
        assert!(relative.is_relative());

        swap(&pointer, &relative).unwrap();
        assert!(fs::read_link(&pointer).unwrap().is_absolute());
        assert_eq!(resolve(&pointer).unwrap().slug, "a");
    }

    #[test]
    fn test_swap_into_read_only_dir_is_permission() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let a = theme_dir(&temp, "a");
        let current = temp.path().join("current");
        fs::create_dir_all(&current).unwrap();
        fs::set_permissions(&current, fs::Permissions::from_mode(0o555)).unwrap();

        let writable = fs::write(current.join("check"), "x").is_ok();
        let result = swap(&current.join("theme"), &a);
        fs::set_permissions(&current, fs::Permissions::from_mode(0o755)).unwrap();

        if writable {
            eprintln!("skipping: directory permissions are not enforced for this user");
            return;
        }
        let err = result.unwrap_err();
        assert!(err.is_permission(), "{err:?}");
        assert!(err.hint().unwrap().contains("current"));
    }

    #[test]
    fn test_broken_pointer_reads_as_none() {
        let temp = TempDir::new().unwrap();
        let a = theme_dir(&temp, "a");
        let pointer = temp.path().join("current").join("theme");
        swap(&pointer, &a).unwrap();
        fs::remove_dir_all(&a).unwrap();

        assert!(resolve(&pointer).is_none());
        assert_eq!(target_slug(&pointer).as_deref(), Some("a"));
    }

    #[test]
    fn test_state_roundtrip_and_corruption() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");
        assert_eq!(ThemeState::load(&path), ThemeState::default());

        let state = ThemeState {
            current_theme: Some("nord".to_string()),
            last_switched: Some(1_700_000_000_000),
            current_wallpaper: None,
        };
        state.save(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"currentTheme\": \"nord\""));
        assert!(text.contains("\"currentWallpaper\": null"));
        assert_eq!(ThemeState::load(&path), state);

        fs::write(&path, "garbage").unwrap();
        assert_eq!(ThemeState::load(&path), ThemeState::default());
    }
}
