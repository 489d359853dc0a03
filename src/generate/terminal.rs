//! Terminal emulator generators: Alacritty, Kitty, Warp, Hyper and iTerm2.

use super::{serialize_error, Integration};
use crate::error::Result;
use crate::theme::{single_line, ColorPalette, HexColor, ThemeMetadata, ANSI_NAMES};
use serde::Serialize;
use std::fmt::Write;

/// Eight named ANSI slots, serialized in index order.
#[derive(Serialize)]
struct AnsiColors {
    black: HexColor,
    red: HexColor,
    green: HexColor,
    yellow: HexColor,
    blue: HexColor,
    magenta: HexColor,
    cyan: HexColor,
    white: HexColor,
}

impl AnsiColors {
    fn from_array(c: [HexColor; 8]) -> Self {
        Self {
            black: c[0],
            red: c[1],
            green: c[2],
            yellow: c[3],
            blue: c[4],
            magenta: c[5],
            cyan: c[6],
            white: c[7],
        }
    }
}

fn header(out: &mut String, comment: &str, app: &str, theme: &ThemeMetadata) {
    let _ = writeln!(out, "{comment} {app} theme: {}", single_line(&theme.name));
    if !theme.author.is_empty() {
        let _ = writeln!(out, "{comment} Author: {}", single_line(&theme.author));
    }
    let _ = writeln!(out, "{comment} Generated by chameleon. Do not edit by hand.");
}

// -- Alacritty ---------------------------------------------------------------

#[derive(Serialize)]
struct AlacrittyDocument {
    colors: AlacrittyColors,
}

#[derive(Serialize)]
struct AlacrittyColors {
    primary: AlacrittyPrimary,
    cursor: AlacrittyPair,
    selection: AlacrittyPair,
    normal: AnsiColors,
    bright: AnsiColors,
}

#[derive(Serialize)]
struct AlacrittyPrimary {
    background: HexColor,
    foreground: HexColor,
}

#[derive(Serialize)]
struct AlacrittyPair {
    text: HexColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    background: Option<HexColor>,
}

pub(super) fn alacritty(theme: &ThemeMetadata) -> Result<String> {
    let c = &theme.colors;
    let doc = AlacrittyDocument {
        colors: AlacrittyColors {
            primary: AlacrittyPrimary {
                background: c.background,
                foreground: c.foreground,
            },
            cursor: AlacrittyPair {
                text: c.background,
                cursor: Some(c.cursor),
                background: None,
            },
            selection: AlacrittyPair {
                text: c.foreground,
                cursor: None,
                background: Some(c.selection),
            },
            normal: AnsiColors::from_array(c.normal()),
            bright: AnsiColors::from_array(c.bright()),
        },
    };

    let body = toml::to_string(&doc).map_err(|e| serialize_error(Integration::Alacritty, e))?;
    let mut out = String::new();
    header(&mut out, "#", "Alacritty", theme);
    out.push('\n');
    out.push_str(&body);
    Ok(out)
}

// -- Kitty -------------------------------------------------------------------

pub(super) fn kitty(theme: &ThemeMetadata) -> String {
    let c = &theme.colors;
    let mut out = String::new();
    header(&mut out, "#", "Kitty", theme);
    out.push('\n');

    let settings: [(&str, HexColor); 14] = [
        ("background", c.background),
        ("foreground", c.foreground),
        ("cursor", c.cursor),
        ("cursor_text_color", c.background),
        ("selection_background", c.selection),
        ("selection_foreground", c.foreground),
        ("url_color", c.accent),
        ("active_border_color", c.accent),
        ("inactive_border_color", c.border),
        ("bell_border_color", c.yellow),
        ("active_tab_background", c.accent),
        ("active_tab_foreground", c.background),
        ("inactive_tab_background", c.selection),
        ("inactive_tab_foreground", c.foreground),
    ];
    for (key, value) in settings {
        let _ = writeln!(out, "{key:<24}{value}");
    }

    out.push('\n');
    for (i, color) in c.ansi().iter().enumerate() {
        let name = ANSI_NAMES[i % 8];
        let variant = if i < 8 { "" } else { "bright " };
        let _ = writeln!(out, "# {variant}{name}");
        let _ = writeln!(out, "{:<24}{color}", format!("color{i}"));
    }
    out
}

// -- Warp --------------------------------------------------------------------

#[derive(Serialize)]
struct WarpTheme<'a> {
    name: &'a str,
    accent: HexColor,
    background: HexColor,
    foreground: HexColor,
    details: &'static str,
    terminal_colors: WarpTerminalColors,
}

#[derive(Serialize)]
struct WarpTerminalColors {
    normal: AnsiColors,
    bright: AnsiColors,
}

pub(super) fn warp(theme: &ThemeMetadata) -> Result<String> {
    let c = &theme.colors;
    let doc = WarpTheme {
        name: &theme.name,
        accent: c.accent,
        background: c.background,
        foreground: c.foreground,
        details: if c.is_light() { "lighter" } else { "darker" },
        terminal_colors: WarpTerminalColors {
            normal: AnsiColors::from_array(c.normal()),
            bright: AnsiColors::from_array(c.bright()),
        },
    };

    let body = serde_yaml::to_string(&doc).map_err(|e| serialize_error(Integration::Warp, e))?;
    let mut out = String::new();
    header(&mut out, "#", "Warp", theme);
    out.push_str(&body);
    Ok(out)
}

// -- Hyper -------------------------------------------------------------------

const HYPER_NAMES: [&str; 16] = [
    "black",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "white",
    "lightBlack",
    "lightRed",
    "lightGreen",
    "lightYellow",
    "lightBlue",
    "lightMagenta",
    "lightCyan",
    "lightWhite",
];

pub(super) fn hyper(theme: &ThemeMetadata) -> String {
    let c = &theme.colors;
    let mut out = String::new();
    header(&mut out, "//", "Hyper", theme);
    out.push_str("module.exports = {\n");
    let _ = writeln!(out, "  backgroundColor: '{}',", c.background);
    let _ = writeln!(out, "  foregroundColor: '{}',", c.foreground);
    let _ = writeln!(out, "  cursorColor: '{}',", c.cursor);
    let _ = writeln!(out, "  cursorAccentColor: '{}',", c.background);
    let _ = writeln!(out, "  selectionColor: '{}',", c.selection);
    let _ = writeln!(out, "  borderColor: '{}',", c.border);
    out.push_str("  colors: {\n");
    for (name, color) in HYPER_NAMES.iter().zip(c.ansi()) {
        let _ = writeln!(out, "    {name}: '{color}',");
    }
    out.push_str("  },\n};\n");
    out
}

// -- iTerm2 ------------------------------------------------------------------

fn iterm_entries(c: &ColorPalette) -> Vec<(String, HexColor)> {
    let mut entries: Vec<(String, HexColor)> = c
        .ansi()
        .iter()
        .enumerate()
        .map(|(i, color)| (format!("Ansi {i} Color"), *color))
        .collect();
    entries.extend([
        ("Background Color".to_string(), c.background),
        ("Bold Color".to_string(), c.foreground),
        ("Cursor Color".to_string(), c.cursor),
        ("Cursor Text Color".to_string(), c.background),
        ("Foreground Color".to_string(), c.foreground),
        ("Link Color".to_string(), c.accent),
        ("Selected Text Color".to_string(), c.foreground),
        ("Selection Color".to_string(), c.selection),
    ]);
    entries
}

pub(super) fn iterm2(theme: &ThemeMetadata) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(
        "<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \
         \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n",
    );
    out.push_str("<plist version=\"1.0\">\n<dict>\n");
    for (key, color) in iterm_entries(&theme.colors) {
        let (r, g, b) = color.unit_channels();
        let _ = writeln!(out, "\t<key>{key}</key>");
        out.push_str("\t<dict>\n");
        out.push_str("\t\t<key>Alpha Component</key>\n\t\t<real>1</real>\n");
        let _ = writeln!(out, "\t\t<key>Blue Component</key>\n\t\t<real>{b:.6}</real>");
        out.push_str("\t\t<key>Color Space</key>\n\t\t<string>sRGB</string>\n");
        let _ = writeln!(out, "\t\t<key>Green Component</key>\n\t\t<real>{g:.6}</real>");
        let _ = writeln!(out, "\t\t<key>Red Component</key>\n\t\t<real>{r:.6}</real>");
        out.push_str("\t</dict>\n");
    }
    out.push_str("</dict>\n</plist>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> ThemeMetadata {
        ThemeMetadata::from_json(include_str!("../../tests/fixtures/midnight.json"))
            .expect("fixture parses")
    }

    #[test]
    fn test_alacritty_parses_as_toml() {
        let text = alacritty(&fixture()).unwrap();
        let value: toml::Value = toml::from_str(&text).unwrap();
        let colors = &value["colors"];
        assert_eq!(colors["primary"]["background"].as_str(), Some("#000000"));
        assert_eq!(colors["primary"]["foreground"].as_str(), Some("#ffffff"));
        for name in ANSI_NAMES {
            assert!(colors["normal"].get(name).is_some(), "normal.{name}");
            assert!(colors["bright"].get(name).is_some(), "bright.{name}");
        }
        assert_eq!(colors["cursor"]["cursor"].as_str(), Some("#f5e0dc"));
        assert_eq!(colors["selection"]["background"].as_str(), Some("#45475a"));
    }

    #[test]
    fn test_kitty_has_sixteen_colors() {
        let text = kitty(&fixture());
        for i in 0..16 {
            let key = format!("color{i}");
            let line = text
                .lines()
                .find(|l| l.split_whitespace().next() == Some(key.as_str()))
                .unwrap_or_else(|| panic!("missing {key}"));
            let value = line.split_whitespace().nth(1).unwrap();
            assert_eq!(value.len(), 7);
            assert!(value.starts_with('#'));
        }
        assert!(text.contains("selection_foreground"));
        // brightRed was upper-case in the fixture
        assert!(text.contains("#f38ba8"));
        assert!(!text.contains("#F38BA8"));
    }

    #[test]
    fn test_warp_parses_as_yaml() {
        let text = warp(&fixture()).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(value["background"].as_str(), Some("#000000"));
        assert_eq!(value["details"].as_str(), Some("darker"));
        for name in ANSI_NAMES {
            assert!(value["terminal_colors"]["normal"][name].as_str().is_some());
            assert!(value["terminal_colors"]["bright"][name].as_str().is_some());
        }
    }

    #[test]
    fn test_hyper_exports_module() {
        let text = hyper(&fixture());
        assert!(text.contains("module.exports = {"));
        for key in ["backgroundColor", "foregroundColor", "cursorColor", "selectionColor"] {
            assert!(text.contains(&format!("{key}: '#")), "{key}");
        }
        for name in HYPER_NAMES {
            assert!(text.contains(&format!("    {name}: '#")), "{name}");
        }
    }

    #[test]
    fn test_iterm2_plist_shape() {
        let text = iterm2(&fixture());
        assert!(text.starts_with("<?xml"));
        assert!(text.contains("<key>Background Color</key>"));
        assert!(text.contains("<key>Foreground Color</key>"));
        assert!(text.contains("<key>Ansi 15 Color</key>"));
        assert_eq!(text.matches("<dict>").count(), text.matches("</dict>").count());
        // background is #000000
        assert!(text.contains("<real>0.000000</real>"));
    }
}
