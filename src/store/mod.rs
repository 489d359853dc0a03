//! # Theme Store
//!
//! [`ThemeManager`] owns the on-disk state: both Theme Directory roots, the
//! current-theme pointer and the preferences file. Every mutating operation
//! goes through it so concurrent callers serialize instead of interleaving
//! partial writes.
//!
//! ## Locks
//!
//! | Lock | Guards | Taken by |
//! |------|--------|----------|
//! | pointer | `current/theme`, `state.json` | apply, update, delete |
//! | themes | both Theme Directory roots | create, update, delete, import, install |
//! | preferences | `preferences.json` | [`PreferencesStore`] |
//!
//! Locks are always acquired in that order.

pub mod archive;
pub mod directory;
pub mod download;
pub(crate) mod fs;
pub mod pointer;

pub use directory::{ThemeEntry, ThemeOrigin, WALLPAPERS_DIR};
pub use download::{DOWNLOAD_TIMEOUT, MAX_REDIRECTS};
pub use pointer::{CurrentTheme, ThemeState};

use crate::error::{Result, ThemeError};
use crate::integrations::{self, reload, ReloadTask};
use crate::paths::AppPaths;
use crate::preferences::{schedule, PreferencesStore};
use crate::theme::{slugify, BundledTheme, ThemeMetadata};
use chrono::NaiveTime;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// What an apply did, beyond switching the pointer.
#[derive(Debug, Clone)]
pub struct ApplyReport {
    pub slug: String,
    pub path: PathBuf,
    pub metadata: ThemeMetadata,
    pub wallpaper: Option<PathBuf>,
    /// Non-fatal problems (bookkeeping, live injection).
    pub warnings: Vec<String>,
    /// Best-effort tasks for the caller to run with [`integrations::run_all`].
    pub reload: Vec<ReloadTask>,
}

/// Entry point for every theme operation.
#[derive(Debug)]
pub struct ThemeManager {
    paths: AppPaths,
    preferences: PreferencesStore,
    pointer_lock: Mutex<()>,
    themes_lock: Mutex<()>,
}

fn lock(mutex: &Mutex<()>) -> MutexGuard<'_, ()> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Without readable preferences the enabled integrations are unknown, so
/// none of them run.
fn skipped_integrations(err: &ThemeError) -> String {
    tracing::warn!(error = %err, "Preferences unreadable; skipping integrations");
    format!("integrations skipped, preferences unreadable: {err}")
}

impl ThemeManager {
    pub fn new(paths: AppPaths) -> Self {
        Self {
            preferences: PreferencesStore::new(paths.preferences_file()),
            paths,
            pointer_lock: Mutex::new(()),
            themes_lock: Mutex::new(()),
        }
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn preferences(&self) -> &PreferencesStore {
        &self.preferences
    }

    /// Write every bundled theme that is not on disk yet. Existing bundled
    /// directories are left alone. Returns the slugs that were written.
    pub fn install_bundled(&self) -> Result<Vec<String>> {
        let _themes = lock(&self.themes_lock);
        let root = self.paths.bundled_dir();
        let mut installed = Vec::new();
        for theme in BundledTheme::all() {
            let meta = theme.metadata();
            let slug = meta.slug();
            let dest = root.join(&slug);
            if dest.exists() {
                continue;
            }
            directory::create_at(&root, &dest, &meta)?;
            tracing::info!(theme = %slug, "Installed bundled theme");
            installed.push(slug);
        }
        Ok(installed)
    }

    /// Every loadable theme, bundled first. Broken directories are skipped.
    pub fn list(&self) -> Vec<ThemeEntry> {
        let mut entries = directory::list_root(&self.paths.bundled_dir(), ThemeOrigin::Bundled);
        entries.extend(directory::list_root(
            &self.paths.custom_dir(),
            ThemeOrigin::Custom,
        ));
        entries
    }

    /// Resolve a theme name (or slug) to a loadable Theme Directory. Bundled
    /// themes win over custom ones with the same slug.
    pub fn find(&self, name: &str) -> Result<ThemeEntry> {
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(ThemeError::NotFound(name.to_string()));
        }
        [
            (self.paths.bundled_dir(), ThemeOrigin::Bundled),
            (self.paths.custom_dir(), ThemeOrigin::Custom),
        ]
        .into_iter()
        .find_map(|(root, origin)| {
            let path = root.join(&slug);
            if !path.is_dir() {
                return None;
            }
            let metadata = directory::load_theme(&path)?;
            Some(ThemeEntry {
                slug: slug.clone(),
                is_light: metadata.is_light(),
                is_custom: origin == ThemeOrigin::Custom,
                path,
                metadata,
                origin,
            })
        })
        .ok_or_else(|| ThemeError::NotFound(name.to_string()))
    }

    fn is_bundled(&self, slug: &str) -> bool {
        self.paths.bundled_dir().join(slug).exists()
    }

    fn slug_taken(&self, slug: &str) -> bool {
        self.is_bundled(slug) || self.paths.custom_dir().join(slug).exists()
    }

    /// Whether the pointer currently targets `dir`.
    fn is_active(&self, dir: &Path) -> bool {
        match (
            std::fs::canonicalize(self.paths.pointer()),
            std::fs::canonicalize(dir),
        ) {
            (Ok(active), Ok(dir)) => active == dir,
            _ => false,
        }
    }

    /// Create a custom theme. Fails with a validation error when the slug is
    /// already used in either root; nothing is written in that case.
    pub fn create(&self, meta: &ThemeMetadata) -> Result<ThemeEntry> {
        meta.validate()?;
        let slug = meta.slug();
        let _themes = lock(&self.themes_lock);
        if self.slug_taken(&slug) {
            return Err(ThemeError::Validation(format!(
                "a theme named '{}' already exists ({slug})",
                meta.name
            )));
        }

        let root = self.paths.custom_dir();
        let dest = root.join(&slug);
        directory::create_at(&root, &dest, meta)?;
        tracing::info!(theme = %slug, path = %dest.display(), "Created theme");
        Ok(ThemeEntry {
            slug,
            path: dest,
            metadata: meta.clone(),
            origin: ThemeOrigin::Custom,
            is_custom: true,
            is_light: meta.is_light(),
        })
    }

    /// Regenerate a custom theme from `meta`. The directory name stays the
    /// theme's identity even if `meta.name` changes. When the theme is
    /// active, live injection is re-run; its warnings are returned.
    pub fn update(&self, name: &str, meta: &ThemeMetadata) -> Result<Vec<String>> {
        meta.validate()?;
        let slug = slugify(name);
        if !slug.is_empty() && self.is_bundled(&slug) {
            return Err(ThemeError::Validation(format!(
                "'{name}' is a bundled theme and cannot be modified"
            )));
        }

        let _pointer = lock(&self.pointer_lock);
        let _themes = lock(&self.themes_lock);
        let dest = self.paths.custom_dir().join(&slug);
        if slug.is_empty() || !dest.is_dir() {
            return Err(ThemeError::NotFound(name.to_string()));
        }
        directory::regenerate(&self.paths.custom_dir(), &dest, meta)?;
        tracing::info!(theme = %slug, "Updated theme");

        if !self.is_active(&dest) {
            return Ok(Vec::new());
        }
        match self.preferences.get() {
            Ok(prefs) => Ok(integrations::inject_all(&prefs, meta, &self.paths.pointer())),
            Err(e) => Ok(vec![skipped_integrations(&e)]),
        }
    }

    /// Delete a custom theme. Bundled and active themes are refused.
    pub fn delete(&self, name: &str) -> Result<()> {
        let slug = slugify(name);
        if !slug.is_empty() && self.is_bundled(&slug) {
            return Err(ThemeError::Validation(format!(
                "'{name}' is a bundled theme and cannot be deleted"
            )));
        }

        let _pointer = lock(&self.pointer_lock);
        let _themes = lock(&self.themes_lock);
        let dest = self.paths.custom_dir().join(&slug);
        if slug.is_empty() || !dest.is_dir() {
            return Err(ThemeError::NotFound(name.to_string()));
        }
        if self.is_active(&dest) {
            return Err(ThemeError::Validation(format!(
                "'{name}' is the active theme; apply another theme before deleting it"
            )));
        }

        fs::remove_any(&dest)?;
        tracing::info!(theme = %slug, "Deleted theme");
        if let Err(e) = self.preferences.update(|p| p.forget(&slug)) {
            tracing::warn!(theme = %slug, error = %e, "Failed to drop deleted theme from preferences");
        }
        Ok(())
    }

    /// Make `name` the active theme.
    ///
    /// The pointer and `state.json` change together: if the state cannot be
    /// written the pointer is rolled back. Everything after that (recent
    /// list, live injection) is best-effort and reported as warnings.
    pub fn apply(&self, name: &str) -> Result<ApplyReport> {
        let _pointer = lock(&self.pointer_lock);
        let entry = self.find(name)?;
        let link = self.paths.pointer();
        let previous = std::fs::read_link(&link).ok();

        pointer::swap(&link, &entry.path)?;

        let wallpaper = directory::first_wallpaper(&entry.path);
        let state = ThemeState {
            current_theme: Some(entry.slug.clone()),
            last_switched: Some(chrono::Utc::now().timestamp_millis()),
            current_wallpaper: wallpaper.as_ref().map(|p| p.display().to_string()),
        };
        if let Err(e) = state.save(&self.paths.state_file()) {
            let rollback = match &previous {
                Some(target) => pointer::swap(&link, target),
                None => fs::remove_any(&link),
            };
            if let Err(rollback) = rollback {
                tracing::error!(error = %rollback, "Failed to restore theme pointer");
            }
            return Err(e);
        }
        tracing::info!(theme = %entry.slug, path = %entry.path.display(), "Applied theme");

        let mut warnings = Vec::new();
        let mut reload = Vec::new();
        match self.preferences.update(|p| {
            p.push_recent(&entry.slug);
            p.clone()
        }) {
            Ok(prefs) => {
                warnings.extend(integrations::inject_all(&prefs, &entry.metadata, &link));
                reload = reload::plan(
                    &prefs,
                    &entry.slug,
                    &entry.metadata,
                    &entry.path,
                    wallpaper.as_deref(),
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to update recent themes");
                warnings.push(format!("recent themes: {e}"));
                warnings.push(skipped_integrations(&e));
            }
        }

        Ok(ApplyReport {
            slug: entry.slug,
            path: entry.path,
            metadata: entry.metadata,
            wallpaper,
            warnings,
            reload,
        })
    }

    /// Apply the theme the auto-switch schedule wants at `now`, if it differs
    /// from the active one.
    pub fn apply_scheduled(&self, now: NaiveTime) -> Result<Option<ApplyReport>> {
        let prefs = self.preferences.get()?;
        let Some(auto) = prefs.auto_switch.as_ref() else {
            return Ok(None);
        };
        let Some(wanted) = schedule::scheduled_theme(auto, now) else {
            return Ok(None);
        };
        let current = self.current().map(|c| c.slug);
        if current.as_deref() == Some(slugify(wanted).as_str()) {
            tracing::debug!(theme = wanted, "Scheduled theme already active");
            return Ok(None);
        }
        self.apply(wanted).map(Some)
    }

    /// The active theme, or `None` when the pointer is absent or broken.
    pub fn current(&self) -> Option<CurrentTheme> {
        pointer::resolve(&self.paths.pointer())
    }

    /// Contents of `state.json`.
    pub fn state(&self) -> ThemeState {
        ThemeState::load(&self.paths.state_file())
    }

    /// Write `name` to a zip archive at `dest`.
    pub fn export(&self, name: &str, dest: &Path) -> Result<()> {
        let entry = self.find(name)?;
        archive::export(&entry.path, &entry.slug, dest)
    }

    /// Import a zip archive from disk into the custom root.
    pub fn import_archive(&self, path: &Path) -> Result<ThemeEntry> {
        let slug = {
            let _themes = lock(&self.themes_lock);
            archive::import(path, &self.paths.custom_dir(), |s| self.slug_taken(s))?
        };
        self.find(&slug)
    }

    /// Download a zip archive and import it.
    pub async fn import_url(&self, url: &str) -> Result<ThemeEntry> {
        let file = download::download(url).await?;
        self.import_archive(file.path())
    }

    /// Flip the favorite flag on `name`; returns whether it is now a favorite.
    pub fn toggle_favorite(&self, name: &str) -> Result<bool> {
        let entry = self.find(name)?;
        self.preferences.update(|p| p.toggle_favorite(&entry.slug))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> ThemeMetadata {
        ThemeMetadata::from_json(include_str!("../../tests/fixtures/midnight.json"))
            .expect("fixture parses")
    }

    fn manager(temp: &TempDir) -> ThemeManager {
        ThemeManager::new(AppPaths::new(temp.path()))
    }

    #[test]
    fn test_install_bundled_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        assert_eq!(manager.install_bundled().unwrap().len(), BundledTheme::all().len());
        assert!(manager.install_bundled().unwrap().is_empty());
        assert!(manager.find("Nord").unwrap().origin == ThemeOrigin::Bundled);
    }

    #[test]
    fn test_create_rejects_bundled_slug() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        manager.install_bundled().unwrap();
        let mut meta = fixture();
        meta.name = "Nord".to_string();
        assert!(manager.create(&meta).unwrap_err().is_validation());
    }

    #[test]
    fn test_apply_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = manager(&temp).apply("ghost").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_apply_records_state_and_recent() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        manager.create(&fixture()).unwrap();
        // keep live injection away from the real home directory
        manager
            .preferences()
            .update(|p| p.enabled_apps = Some(vec![]))
            .unwrap();

        let report = manager.apply("Midnight").unwrap();
        assert_eq!(report.slug, "midnight");
        assert!(report.reload.is_empty());
        assert_eq!(manager.current().unwrap().slug, "midnight");
        assert_eq!(manager.state().current_theme.as_deref(), Some("midnight"));
        assert_eq!(
            manager.preferences().get().unwrap().recent_themes(),
            ["midnight".to_string()]
        );
    }

    #[test]
    fn test_state_write_failure_rolls_back_pointer() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        manager.create(&fixture()).unwrap();
        // a directory where state.json should be makes the save fail
        std::fs::create_dir_all(manager.paths().state_file()).unwrap();

        assert!(manager.apply("midnight").is_err());
        assert!(manager.current().is_none());
        assert!(std::fs::symlink_metadata(manager.paths().pointer()).is_err());
    }

    #[test]
    fn test_update_keeps_identity_and_rejects_bundled() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        manager.install_bundled().unwrap();
        manager.create(&fixture()).unwrap();

        let mut meta = fixture();
        meta.name = "Midnight Blue".to_string();
        manager.update("midnight", &meta).unwrap();
        assert_eq!(manager.find("midnight").unwrap().metadata.name, "Midnight Blue");
        assert!(manager.find("midnight-blue").is_err());

        assert!(manager.update("nord", &meta).unwrap_err().is_validation());
        assert!(manager.update("ghost", &meta).unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_unnamable_theme_is_not_found() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        manager.install_bundled().unwrap();
        let err = manager.update("***", &fixture()).unwrap_err();
        assert!(err.is_not_found(), "{err:?}");
    }

    #[test]
    fn test_corrupt_preferences_skip_integrations() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        manager.create(&fixture()).unwrap();
        std::fs::write(manager.paths().preferences_file(), "{ truncated").unwrap();

        let report = manager.apply("midnight").unwrap();
        assert!(report.reload.is_empty());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.starts_with("integrations skipped")));
        assert_eq!(manager.current().unwrap().slug, "midnight");

        let warnings = manager.update("midnight", &fixture()).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("integrations skipped"));
    }

    #[test]
    fn test_delete_forgets_preferences() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        manager.create(&fixture()).unwrap();
        assert!(manager.toggle_favorite("midnight").unwrap());

        manager.delete("midnight").unwrap();
        assert!(manager.find("midnight").is_err());
        let prefs = manager.preferences().get().unwrap();
        assert_eq!(prefs.favorites.as_deref(), Some(&[][..]));
    }

    #[test]
    fn test_apply_scheduled_switches_once() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        manager.install_bundled().unwrap();
        manager
            .preferences()
            .update(|p| {
                p.enabled_apps = Some(vec![]);
                p.auto_switch = Some(crate::preferences::AutoSwitch {
                    enabled: true,
                    light_theme: Some("solarized-light".to_string()),
                    dark_theme: Some("nord".to_string()),
                    light_time: Some("07:00".to_string()),
                    dark_time: Some("19:00".to_string()),
                });
            })
            .unwrap();

        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let report = manager.apply_scheduled(noon).unwrap().unwrap();
        assert_eq!(report.slug, "solarized-light");
        assert!(manager.apply_scheduled(noon).unwrap().is_none());

        let night = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        assert_eq!(manager.apply_scheduled(night).unwrap().unwrap().slug, "nord");
    }
}
