//! Whole-document preferences behaviour as seen from outside the crate

use anyhow::bail;
use chameleon::preferences::{
    AutoSwitch, KeyboardShortcuts, PreferenceEffects, Preferences, PreferencesStore, SideEffect,
};
use std::fs;
use tempfile::TempDir;

/// Side effects that always fail, to check they never undo the write.
struct FailingEffects;

impl PreferenceEffects for FailingEffects {
    fn set_menu_bar_visible(&self, _visible: bool) -> anyhow::Result<()> {
        bail!("tray unavailable")
    }

    fn register_shortcuts(&self, _: Option<&KeyboardShortcuts>) -> anyhow::Result<()> {
        bail!("shortcut already taken")
    }

    fn rearm_schedule(&self, _: Option<&AutoSwitch>) -> anyhow::Result<()> {
        bail!("timer failed")
    }
}

#[test]
fn test_unset_fields_stay_unset() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("preferences.json");
    fs::write(&path, r#"{"favorites": ["nord"], "futureSetting": {"a": 1}}"#).unwrap();
    let store = PreferencesStore::new(&path);

    let prefs = store.get().unwrap();
    assert_eq!(prefs.favorites.as_deref(), Some(&["nord".to_string()][..]));
    assert!(prefs.auto_switch.is_none());
    assert!(prefs.show_in_menu_bar.is_none());

    store.update(|p| p.push_recent("nord")).unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["futureSetting"]["a"], 1);
    assert_eq!(written["recentThemes"][0], "nord");
    assert!(written.get("autoSwitch").is_none());
    assert!(written.get("showInMenuBar").is_none());
}

#[test]
fn test_failing_side_effects_keep_the_new_document() {
    let temp = TempDir::new().unwrap();
    let store = PreferencesStore::new(temp.path().join("preferences.json"));

    let new = Preferences {
        show_in_menu_bar: Some(false),
        keyboard_shortcuts: Some(KeyboardShortcuts {
            toggle_switcher: Some("Cmd+Shift+T".to_string()),
            next_theme: None,
        }),
        auto_switch: Some(AutoSwitch {
            enabled: true,
            light_time: Some("07:00".to_string()),
            dark_time: Some("19:00".to_string()),
            ..AutoSwitch::default()
        }),
        ..Preferences::default()
    };
    let outcomes = store.set(&new, &FailingEffects).unwrap();

    let effects: Vec<_> = outcomes.iter().map(|o| o.effect).collect();
    assert_eq!(
        effects,
        vec![SideEffect::MenuBar, SideEffect::Shortcuts, SideEffect::Schedule]
    );
    assert!(outcomes.iter().all(|o| o.error.is_some()));
    assert_eq!(store.get().unwrap(), new);
}

#[test]
fn test_set_over_corrupt_file_succeeds() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("preferences.json");
    fs::write(&path, "{ truncated").unwrap();
    let store = PreferencesStore::new(&path);
    assert!(store.get().unwrap_err().is_validation());

    let new = Preferences {
        onboarding_completed: Some(true),
        ..Preferences::default()
    };
    store.set(&new, &FailingEffects).unwrap();
    assert_eq!(store.get().unwrap(), new);
}
