//! # Application Paths
//!
//! Everything Chameleon persists lives under one application-support root:
//!
//! ```text
//! <root>/
//! ├── themes/<slug>/          bundled, read-only
//! ├── custom-themes/<slug>/   user-created or imported
//! ├── current/theme           symlink to the active Theme Directory
//! ├── state.json              { currentTheme, lastSwitched, currentWallpaper }
//! ├── preferences.json        user settings
//! └── logs/chameleon.jsonl
//! ```
//!
//! The root is resolved from `--root`, then `CHAMELEON_HOME`, then the
//! platform data directory (`~/Library/Application Support/chameleon` on macOS).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding the application-support root.
pub const HOME_ENV: &str = "CHAMELEON_HOME";

/// Resolved on-disk layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    /// Use an explicit root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the root from an optional override, the environment, or the
    /// platform data directory.
    ///
    /// A relative root is made absolute so the pointer symlink never depends
    /// on the working directory.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        let from_env = || {
            std::env::var_os(HOME_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        let root = match explicit.or_else(from_env) {
            Some(root) => root,
            None => directories::ProjectDirs::from("", "", "chameleon")
                .context("Failed to determine application data directory")?
                .data_dir()
                .to_path_buf(),
        };
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()
                .context("Failed to get current working directory")?
                .join(root)
        };
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Bundled, read-only Theme Directories.
    pub fn bundled_dir(&self) -> PathBuf {
        self.root.join("themes")
    }

    /// User-writable Theme Directories.
    pub fn custom_dir(&self) -> PathBuf {
        self.root.join("custom-themes")
    }

    /// Directory holding the pointer symlink.
    pub fn current_dir(&self) -> PathBuf {
        self.root.join("current")
    }

    /// The Current-Theme Pointer symlink.
    pub fn pointer(&self) -> PathBuf {
        self.current_dir().join("theme")
    }

    pub fn state_file(&self) -> PathBuf {
        self.root.join("state.json")
    }

    pub fn preferences_file(&self) -> PathBuf {
        self.root.join("preferences.json")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}

/// The user's home directory, if one can be determined.
pub fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let paths = AppPaths::new("/data/chameleon");
        assert_eq!(paths.bundled_dir(), PathBuf::from("/data/chameleon/themes"));
        assert_eq!(
            paths.custom_dir(),
            PathBuf::from("/data/chameleon/custom-themes")
        );
        assert_eq!(
            paths.pointer(),
            PathBuf::from("/data/chameleon/current/theme")
        );
        assert_eq!(
            paths.state_file(),
            PathBuf::from("/data/chameleon/state.json")
        );
        assert_eq!(
            paths.preferences_file(),
            PathBuf::from("/data/chameleon/preferences.json")
        );
    }

    #[test]
    fn test_explicit_root_wins() {
        let paths = AppPaths::resolve(Some(PathBuf::from("/explicit"))).unwrap();
        assert_eq!(paths.root(), Path::new("/explicit"));
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let paths = AppPaths::resolve(Some(PathBuf::from("relative/root"))).unwrap();
        assert!(paths.root().is_absolute());
        assert!(paths.root().ends_with("relative/root"));
    }
}
