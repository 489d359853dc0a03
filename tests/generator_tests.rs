//! Properties every generated config must hold, checked against both fixtures

use chameleon::generate::{generate_all, Integration};
use chameleon::store::directory::create_at;
use chameleon::theme::ThemeMetadata;
use std::fs;
use tempfile::TempDir;

fn fixtures() -> Vec<ThemeMetadata> {
    [
        include_str!("fixtures/midnight.json"),
        include_str!("fixtures/daylight.json"),
    ]
    .into_iter()
    .map(|text| ThemeMetadata::from_json(text).expect("fixture parses"))
    .collect()
}

/// Keys each integration's file must contain.
fn required_keys(integration: Integration) -> Vec<String> {
    let fixed: &[&str] = match integration {
        Integration::Alacritty => &["[colors.primary]", "[colors.normal]", "[colors.bright]"],
        Integration::Kitty => &["background", "foreground", "cursor", "selection_background"],
        Integration::Warp => &["background:", "foreground:", "accent:", "terminal_colors:"],
        Integration::Hyper => &["backgroundColor", "foregroundColor", "cursorColor", "colors"],
        Integration::Iterm2 => &["Background Color", "Foreground Color", "Selection Color"],
        Integration::Bat => &["--theme="],
        Integration::Delta => &["[delta]", "plus-style", "minus-style", "syntax-theme"],
        Integration::Zsh => &["ZSH_HIGHLIGHT_STYLES[command]", "ZSH_HIGHLIGHT_STYLES[comment]"],
        Integration::Raycast => &["\"background\"", "\"text\"", "\"selection\"", "\"accent\""],
        Integration::Starship => &["format", "[directory]", "[character]"],
        Integration::Vscode => &["workbench.colorCustomizations", "editor.background"],
        Integration::Neovim => &["highlight Normal", "vim.g.colors_name"],
    };
    let mut keys: Vec<String> = fixed.iter().map(|k| (*k).to_string()).collect();

    match integration {
        Integration::Kitty => keys.extend((0..16).map(|i| format!("color{i}"))),
        Integration::Iterm2 => keys.extend((0..16).map(|i| format!("Ansi {i} Color"))),
        Integration::Neovim => keys.extend((0..16).map(|i| format!("terminal_color_{i}"))),
        _ => {}
    }
    keys
}

/// Every `#`-prefixed hex token in `text`.
fn hex_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for (start, _) in text.match_indices('#') {
        let rest = &text[start + 1..];
        let len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        let token = &rest[..len];
        if !token.is_empty() && token.chars().all(|c| c.is_ascii_hexdigit()) {
            tokens.push(&text[start..start + 1 + len]);
        }
    }
    tokens
}

#[test]
fn test_every_integration_has_its_required_keys() {
    for theme in fixtures() {
        for file in generate_all(&theme).unwrap() {
            for key in required_keys(file.integration) {
                assert!(
                    file.contents.contains(&key),
                    "{} for '{}' is missing {key}",
                    file.file_name,
                    theme.name
                );
            }
        }
    }
}

#[test]
fn test_every_color_is_six_digit_hex() {
    for theme in fixtures() {
        for file in generate_all(&theme).unwrap() {
            for token in hex_tokens(&file.contents) {
                assert_eq!(
                    token.len(),
                    7,
                    "{} emitted '{token}' for '{}'",
                    file.file_name,
                    theme.name
                );
            }
        }
    }
}

#[test]
fn test_uppercase_input_is_normalized() {
    let theme = &fixtures()[0];
    let kitty = Integration::Kitty.generate(theme).unwrap();
    assert!(kitty.contains("#f38ba8"));
    assert!(!kitty.contains("#F38BA8"));
}

#[test]
fn test_every_palette_color_reaches_vscode() {
    for theme in fixtures() {
        let text = Integration::Vscode.generate(&theme).unwrap();
        for color in theme.colors.ansi() {
            assert!(text.contains(&color.to_string()), "{color} missing");
        }
        assert!(text.contains(&theme.colors.background.to_string()));
        assert!(text.contains(&theme.colors.accent.to_string()));
    }
}

#[test]
fn test_regeneration_is_byte_identical() {
    let temp = TempDir::new().unwrap();
    for theme in fixtures() {
        let first = temp.path().join(format!("{}-a", theme.slug()));
        let second = temp.path().join(format!("{}-b", theme.slug()));
        create_at(temp.path(), &first, &theme).unwrap();
        create_at(temp.path(), &second, &theme).unwrap();

        for integration in Integration::ALL {
            let a = fs::read(first.join(integration.file_name())).unwrap();
            let b = fs::read(second.join(integration.file_name())).unwrap();
            assert_eq!(a, b, "{integration} differs between runs");
        }
        assert_eq!(
            fs::read(first.join("theme.json")).unwrap(),
            fs::read(second.join("theme.json")).unwrap()
        );
    }
}

#[test]
fn test_incomplete_palette_is_rejected() {
    let mut value: serde_json::Value =
        serde_json::from_str(include_str!("fixtures/midnight.json")).unwrap();
    value["colors"].as_object_mut().unwrap().remove("brightCyan");
    let err = ThemeMetadata::from_json(&value.to_string()).unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("brightCyan"), "{err}");
}
