//! The `preferences.json` document.
//!
//! Every field is optional. A key that is absent from the file stays `None`
//! here and is written back absent; callers decide what "unset" means.
//! Keys this version does not know about are preserved in [`Preferences::extra`].

use crate::generate::Integration;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Maximum length of the recent-themes list.
pub const MAX_RECENT_THEMES: usize = 10;

/// User settings, read and written as one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Integration ids that receive live injection and reload nudges.
    /// Unset means every integration is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_apps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorites: Option<Vec<String>>,
    /// Most recently applied first, at most [`MAX_RECENT_THEMES`] entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_themes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationPrefs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_switch: Option<AutoSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallpaper: Option<WallpaperPrefs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard_shortcuts: Option<KeyboardShortcuts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_menu_bar: Option<bool>,
    /// Executable run after each successful apply, with the slug as argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_script: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding_completed: Option<bool>,
    /// Override for the VS Code user `settings.json` location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vscode_settings_path: Option<PathBuf>,
    /// Override for the shell rc file that sources the zsh theme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell_rc_path: Option<PathBuf>,
    /// Unknown keys, kept so a rewrite never drops them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPrefs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_theme_change: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_scheduled_switch: Option<bool>,
}

/// Time-of-day switching between a light and a dark theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSwitch {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_theme: Option<String>,
    /// `HH:MM`, start of the light period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_time: Option<String>,
    /// `HH:MM`, start of the dark period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallpaperPrefs {
    /// Set the desktop picture from the theme's `wallpapers/` on apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardShortcuts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggle_switcher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_theme: Option<String>,
}

impl Preferences {
    /// The recent-themes list (empty when unset).
    pub fn recent_themes(&self) -> &[String] {
        self.recent_themes.as_deref().unwrap_or_default()
    }

    /// Move `slug` to the front of the recent list, capping its length.
    pub fn push_recent(&mut self, slug: &str) {
        let recent = self.recent_themes.get_or_insert_with(Vec::new);
        recent.retain(|s| s != slug);
        recent.insert(0, slug.to_string());
        recent.truncate(MAX_RECENT_THEMES);
    }

    /// Drop `slug` from the recent and favorite lists.
    pub fn forget(&mut self, slug: &str) {
        if let Some(recent) = self.recent_themes.as_mut() {
            recent.retain(|s| s != slug);
        }
        if let Some(favorites) = self.favorites.as_mut() {
            favorites.retain(|s| s != slug);
        }
    }

    /// Flip `slug`'s favorite status; returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, slug: &str) -> bool {
        let favorites = self.favorites.get_or_insert_with(Vec::new);
        if let Some(pos) = favorites.iter().position(|s| s == slug) {
            favorites.remove(pos);
            false
        } else {
            favorites.push(slug.to_string());
            true
        }
    }

    /// Whether live injection / reload is enabled for `integration`.
    pub fn is_enabled(&self, integration: Integration) -> bool {
        match &self.enabled_apps {
            None => true,
            Some(apps) => apps.iter().any(|a| a.eq_ignore_ascii_case(integration.id())),
        }
    }

    /// Whether theme-change notifications should be shown.
    pub fn notify_on_change(&self) -> bool {
        self.notifications.as_ref().is_some_and(|n| {
            n.enabled.unwrap_or(false) && n.on_theme_change.unwrap_or(true)
        })
    }

    /// Whether apply should set the desktop picture.
    pub fn wallpaper_enabled(&self) -> bool {
        self.wallpaper
            .as_ref()
            .and_then(|w| w.enabled)
            .unwrap_or(false)
    }
}
