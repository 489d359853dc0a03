//! Live injection into files owned by other applications.
//!
//! Most integrations read the active Theme Directory through the
//! `current/theme` pointer. Two cannot:
//!
//! - **VS Code** keeps colours in its user `settings.json`, so
//!   `workbench.colorCustomizations` is rewritten there on every apply.
//! - **zsh** needs a `source` line in the rc file. It points through the
//!   pointer, so it is written once and follows every later apply.

use crate::generate::{vscode_color_customizations, Integration};
use crate::paths::home_dir;
use crate::preferences::Preferences;
use crate::store::fs::write_json;
use crate::theme::ThemeMetadata;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Marker appended to lines Chameleon writes into rc files.
const RC_MARKER: &str = "# added by chameleon";

/// Default VS Code user settings location for this platform.
pub fn default_vscode_settings() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("Code").join("User").join("settings.json"))
}

/// Default shell rc file.
pub fn default_shell_rc() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".zshrc"))
}

/// Set `workbench.colorCustomizations` in the VS Code settings file at
/// `settings`, keeping every other key.
///
/// Returns `Ok(false)` without touching anything when VS Code's user
/// directory does not exist.
pub fn inject_vscode(settings: &Path, theme: &ThemeMetadata) -> Result<bool> {
    let Some(user_dir) = settings.parent() else {
        return Ok(false);
    };
    if !user_dir.is_dir() {
        tracing::debug!(path = %user_dir.display(), "VS Code user directory not found; skipping");
        return Ok(false);
    }

    let mut doc: Map<String, Value> = match fs::read_to_string(settings) {
        Ok(text) if text.trim().is_empty() => Map::new(),
        Ok(text) => serde_json::from_str(&text).with_context(|| {
            format!(
                "VS Code settings are not plain JSON (comments?); not modifying {}",
                settings.display()
            )
        })?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", settings.display()))
        }
    };

    doc.insert(
        "workbench.colorCustomizations".to_string(),
        vscode_color_customizations(theme),
    );
    write_json(settings, &doc)?;
    tracing::info!(path = %settings.display(), "Updated VS Code color customizations");
    Ok(true)
}

/// The line that sources the active zsh theme through the pointer.
pub fn shell_source_line(pointer: &Path) -> String {
    let file = pointer.join(Integration::Zsh.file_name());
    let quoted = file.display().to_string().replace('"', "\\\"");
    format!("[ -f \"{quoted}\" ] && source \"{quoted}\" {RC_MARKER}")
}

/// Make sure `rc` sources the zsh theme. Returns `Ok(true)` when the line was
/// added, `Ok(false)` when it was already present or the rc file is absent.
pub fn inject_shell_rc(rc: &Path, pointer: &Path) -> Result<bool> {
    let existing = match fs::read_to_string(rc) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %rc.display(), "Shell rc file not found; skipping");
            return Ok(false);
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", rc.display())),
    };

    let line = shell_source_line(pointer);
    if existing.lines().any(|l| l.trim() == line) {
        return Ok(false);
    }

    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(&line);
    updated.push('\n');
    crate::store::fs::atomic_write(rc, updated.as_bytes())?;
    tracing::info!(path = %rc.display(), "Added zsh theme source line");
    Ok(true)
}

/// Run every enabled live injection for `theme`. Failures are logged and
/// returned as warnings; they never fail the apply.
pub fn inject_all(prefs: &Preferences, theme: &ThemeMetadata, pointer: &Path) -> Vec<String> {
    let mut warnings = Vec::new();

    if prefs.is_enabled(Integration::Vscode) {
        let target = prefs
            .vscode_settings_path
            .clone()
            .or_else(default_vscode_settings);
        if let Some(target) = target {
            if let Err(e) = inject_vscode(&target, theme) {
                tracing::warn!(error = %format!("{e:#}"), "VS Code injection failed");
                warnings.push(format!("vscode: {e:#}"));
            }
        }
    }

    if prefs.is_enabled(Integration::Zsh) {
        let target = prefs.shell_rc_path.clone().or_else(default_shell_rc);
        if let Some(target) = target {
            if let Err(e) = inject_shell_rc(&target, pointer) {
                tracing::warn!(error = %format!("{e:#}"), "Shell rc injection failed");
                warnings.push(format!("zsh: {e:#}"));
            }
        }
    }

    warnings
}
