//! # Preferences Module
//!
//! User settings stored as a single JSON document at `<root>/preferences.json`.
//!
//! ## Data Format
//!
//! ```json
//! {
//!   "enabledApps": ["kitty", "vscode", "zsh"],
//!   "favorites": ["nord"],
//!   "recentThemes": ["nord", "dracula"],
//!   "notifications": { "enabled": true, "onThemeChange": true },
//!   "autoSwitch": {
//!     "enabled": true,
//!     "lightTheme": "solarized-light",
//!     "darkTheme": "nord",
//!     "lightTime": "07:00",
//!     "darkTime": "19:00"
//!   },
//!   "wallpaper": { "enabled": false },
//!   "keyboardShortcuts": { "toggleSwitcher": "Cmd+Shift+T" },
//!   "showInMenuBar": true,
//!   "hookScript": "/Users/me/.config/chameleon/hook.sh",
//!   "onboardingCompleted": true
//! }
//! ```

mod document;
pub mod schedule;
mod store;

pub use document::{
    AutoSwitch, KeyboardShortcuts, NotificationPrefs, Preferences, WallpaperPrefs,
    MAX_RECENT_THEMES,
};
pub use store::{LoggedEffects, PreferenceEffects, PreferencesStore, SideEffect, SideEffectOutcome};
