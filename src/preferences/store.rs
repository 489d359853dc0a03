//! # Preferences Store
//!
//! Whole-document access to `preferences.json`. There is no field-level API:
//! readers get the full document, writers replace it. Writes go through a
//! temp file and a rename, and a mutex serializes read-modify-write cycles
//! within the process.

use super::document::{AutoSwitch, KeyboardShortcuts, Preferences};
use super::schedule;
use crate::error::{Result, ThemeError};
use crate::store::fs::write_json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Subsystems that react to specific preference changes.
///
/// Each method is best-effort: an error is logged by the store and never
/// rolls back the written document or stops the other effects.
pub trait PreferenceEffects {
    /// Show or hide the menu-bar item.
    fn set_menu_bar_visible(&self, visible: bool) -> anyhow::Result<()>;
    /// Re-register global keyboard shortcuts.
    fn register_shortcuts(&self, shortcuts: Option<&KeyboardShortcuts>) -> anyhow::Result<()>;
    /// Re-arm (or cancel) the auto-switch timer.
    fn rearm_schedule(&self, auto_switch: Option<&AutoSwitch>) -> anyhow::Result<()>;
}

/// Effects for a headless process: record what would change in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggedEffects;

impl PreferenceEffects for LoggedEffects {
    fn set_menu_bar_visible(&self, visible: bool) -> anyhow::Result<()> {
        tracing::info!(visible, "Menu bar visibility changed");
        Ok(())
    }

    fn register_shortcuts(&self, shortcuts: Option<&KeyboardShortcuts>) -> anyhow::Result<()> {
        tracing::info!(?shortcuts, "Keyboard shortcuts changed");
        Ok(())
    }

    fn rearm_schedule(&self, auto_switch: Option<&AutoSwitch>) -> anyhow::Result<()> {
        let now = chrono::Local::now().time();
        match auto_switch.and_then(|a| schedule::next_boundary(a, now)) {
            Some(next) => tracing::info!(next = %next, "Auto-switch schedule armed"),
            None => tracing::info!("Auto-switch schedule disabled"),
        }
        Ok(())
    }
}

/// A side effect triggered by [`PreferencesStore::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    MenuBar,
    Shortcuts,
    Schedule,
}

/// What happened to one side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideEffectOutcome {
    pub effect: SideEffect,
    /// `None` on success.
    pub error: Option<String>,
}

/// Guarded access to one `preferences.json`.
#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document. A missing file is an empty document; a corrupt one
    /// is a validation error.
    pub fn get(&self) -> Result<Preferences> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read()
    }

    /// Replace the document with `new`, then run the side effects whose
    /// inputs changed compared to the previous document.
    pub fn set(
        &self,
        new: &Preferences,
        effects: &dyn PreferenceEffects,
    ) -> Result<Vec<SideEffectOutcome>> {
        let old = {
            let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
            let old = self.read().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Previous preferences unreadable; treating as empty");
                Preferences::default()
            });
            write_json(&self.path, new)?;
            old
        };
        tracing::info!(path = %self.path.display(), "Preferences saved");

        let mut outcomes = Vec::new();
        if old.show_in_menu_bar != new.show_in_menu_bar {
            let visible = new.show_in_menu_bar.unwrap_or(true);
            outcomes.push(run_effect(SideEffect::MenuBar, || {
                effects.set_menu_bar_visible(visible)
            }));
        }
        if old.keyboard_shortcuts != new.keyboard_shortcuts {
            outcomes.push(run_effect(SideEffect::Shortcuts, || {
                effects.register_shortcuts(new.keyboard_shortcuts.as_ref())
            }));
        }
        if old.auto_switch != new.auto_switch {
            outcomes.push(run_effect(SideEffect::Schedule, || {
                effects.rearm_schedule(new.auto_switch.as_ref())
            }));
        }
        Ok(outcomes)
    }

    /// Read-modify-write under the lock, without side effects. Used for the
    /// bookkeeping lists (recent themes, favorites).
    pub fn update<T>(&self, f: impl FnOnce(&mut Preferences) -> T) -> Result<T> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut prefs = self.read()?;
        let out = f(&mut prefs);
        write_json(&self.path, &prefs)?;
        Ok(out)
    }

    fn read(&self) -> Result<Preferences> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Preferences::default())
            }
            Err(e) => return Err(ThemeError::from_io(&self.path, e)),
        };
        serde_json::from_str(&text).map_err(|e| {
            ThemeError::Validation(format!(
                "Failed to parse preferences file {}: {e}",
                self.path.display()
            ))
        })
    }
}

fn run_effect(effect: SideEffect, f: impl FnOnce() -> anyhow::Result<()>) -> SideEffectOutcome {
    match f() {
        Ok(()) => SideEffectOutcome {
            effect,
            error: None,
        },
        Err(e) => {
            tracing::warn!(?effect, error = %format!("{e:#}"), "Preference side effect failed");
            SideEffectOutcome {
                effect,
                error: Some(format!("{e:#}")),
            }
        }
    }
}
