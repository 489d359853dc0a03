//! CLI tool generators: bat, delta, zsh-syntax-highlighting, Raycast and Starship.

use super::{serialize_error, Integration};
use crate::error::Result;
use crate::theme::{single_line, HexColor, ThemeMetadata};
use serde::Serialize;
use std::fmt::Write;

/// Quote a value for a double-quoted CLI/gitconfig string.
fn quoted(value: &str) -> String {
    format!(
        "\"{}\"",
        single_line(value).replace('\\', "\\\\").replace('"', "\\\"")
    )
}

// -- bat ---------------------------------------------------------------------

pub(super) fn bat(theme: &ThemeMetadata) -> String {
    let mut out = String::new();
    out.push_str("# Bat theme configuration\n");
    let _ = writeln!(out, "# Theme: {}", single_line(&theme.name));
    out.push('\n');
    let _ = writeln!(out, "--theme={}", quoted(&theme.name));
    out.push_str("--style=\"numbers,changes,header,grid\"\n");
    out.push_str("--color=always\n");
    out.push_str("--italic-text=always\n");
    out
}

// -- delta -------------------------------------------------------------------

pub(super) fn delta(theme: &ThemeMetadata) -> String {
    let c = &theme.colors;
    // Tinted diff backgrounds: a quarter of the ANSI colour over the background.
    let plus_bg = c.background.mix(c.green, 0.25);
    let minus_bg = c.background.mix(c.red, 0.25);
    let plus_emph = c.background.mix(c.green, 0.45);
    let minus_emph = c.background.mix(c.red, 0.45);

    let mut out = String::new();
    let _ = writeln!(out, "# Delta configuration for {}", single_line(&theme.name));
    out.push_str("# Include from ~/.gitconfig with [include] path = <this file>\n");
    out.push_str("[delta]\n");
    let _ = writeln!(out, "    syntax-theme = {}", quoted(&theme.name));
    out.push_str("    line-numbers = true\n");
    out.push_str("    side-by-side = false\n");
    out.push_str("    navigate = true\n");
    let _ = writeln!(out, "    plus-style = \"syntax {plus_bg}\"");
    let _ = writeln!(out, "    plus-emph-style = \"syntax {plus_emph}\"");
    let _ = writeln!(out, "    minus-style = \"syntax {minus_bg}\"");
    let _ = writeln!(out, "    minus-emph-style = \"syntax {minus_emph}\"");
    let _ = writeln!(out, "    file-style = \"{} bold\"", c.accent);
    let _ = writeln!(out, "    file-decoration-style = \"{} ul\"", c.border);
    out.push_str("    hunk-header-style = \"file line-number syntax\"\n");
    let _ = writeln!(out, "    hunk-header-decoration-style = \"{} box\"", c.border);
    let _ = writeln!(out, "    line-numbers-plus-style = \"{}\"", c.green);
    let _ = writeln!(out, "    line-numbers-minus-style = \"{}\"", c.red);
    let _ = writeln!(out, "    line-numbers-zero-style = \"{}\"", c.bright_black);
    out
}

// -- zsh-syntax-highlighting -------------------------------------------------

/// Highlight style keys written by [`zsh`].
const ZSH_STYLE_KEYS: [&str; 22] = [
    "default",
    "unknown-token",
    "reserved-word",
    "alias",
    "suffix-alias",
    "builtin",
    "function",
    "command",
    "precommand",
    "commandseparator",
    "hashed-command",
    "path",
    "globbing",
    "history-expansion",
    "single-hyphen-option",
    "double-hyphen-option",
    "back-quoted-argument",
    "single-quoted-argument",
    "double-quoted-argument",
    "dollar-quoted-argument",
    "redirection",
    "comment",
];

pub(super) fn zsh(theme: &ThemeMetadata) -> String {
    let c = &theme.colors;
    let colors: [HexColor; 22] = [
        c.foreground,
        c.red,
        c.magenta,
        c.green,
        c.green,
        c.cyan,
        c.blue,
        c.green,
        c.green,
        c.magenta,
        c.green,
        c.foreground,
        c.blue,
        c.magenta,
        c.yellow,
        c.yellow,
        c.magenta,
        c.green,
        c.green,
        c.cyan,
        c.cyan,
        c.bright_black,
    ];

    let mut out = String::new();
    let _ = writeln!(
        out,
        "# zsh-syntax-highlighting theme: {}",
        single_line(&theme.name)
    );
    out.push_str("# Source after zsh-syntax-highlighting is loaded.\n");
    out.push_str("typeset -gA ZSH_HIGHLIGHT_STYLES\n");
    for (key, color) in ZSH_STYLE_KEYS.iter().zip(colors) {
        let _ = writeln!(out, "ZSH_HIGHLIGHT_STYLES[{key}]='fg={color}'");
    }
    out
}

// -- Raycast -----------------------------------------------------------------

#[derive(Serialize)]
struct RaycastTheme<'a> {
    name: &'a str,
    author: &'a str,
    appearance: &'static str,
    colors: RaycastColors,
}

#[derive(Serialize)]
struct RaycastColors {
    background: HexColor,
    text: HexColor,
    selection: HexColor,
    accent: HexColor,
}

pub(super) fn raycast(theme: &ThemeMetadata) -> Result<String> {
    let c = &theme.colors;
    let doc = RaycastTheme {
        name: &theme.name,
        author: &theme.author,
        appearance: if c.is_light() { "light" } else { "dark" },
        colors: RaycastColors {
            background: c.background,
            text: c.foreground,
            selection: c.selection,
            accent: c.accent,
        },
    };
    let mut out =
        serde_json::to_string_pretty(&doc).map_err(|e| serialize_error(Integration::Raycast, e))?;
    out.push('\n');
    Ok(out)
}

// -- Starship ----------------------------------------------------------------

#[derive(Serialize)]
struct StarshipConfig {
    format: &'static str,
    directory: StarshipModule,
    git_branch: StarshipModule,
    git_status: StarshipModule,
    character: StarshipCharacter,
}

#[derive(Serialize)]
struct StarshipModule {
    style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol: Option<&'static str>,
}

#[derive(Serialize)]
struct StarshipCharacter {
    success_symbol: String,
    error_symbol: String,
}

pub(super) fn starship(theme: &ThemeMetadata) -> Result<String> {
    let c = &theme.colors;
    let doc = StarshipConfig {
        format: "$directory$git_branch$git_status$character",
        directory: StarshipModule {
            style: format!("bold {}", c.blue),
            symbol: None,
        },
        git_branch: StarshipModule {
            style: c.magenta.to_string(),
            symbol: Some(" "),
        },
        git_status: StarshipModule {
            style: c.red.to_string(),
            symbol: None,
        },
        character: StarshipCharacter {
            success_symbol: format!("[❯](bold {})", c.green),
            error_symbol: format!("[❯](bold {})", c.red),
        },
    };

    let body = toml::to_string(&doc).map_err(|e| serialize_error(Integration::Starship, e))?;
    let mut out = String::new();
    let _ = writeln!(out, "# Starship prompt colors: {}", single_line(&theme.name));
    out.push('\n');
    out.push_str(&body);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> ThemeMetadata {
        ThemeMetadata::from_json(include_str!("../../tests/fixtures/midnight.json"))
            .expect("fixture parses")
    }

    #[test]
    fn test_bat_header_and_flags() {
        let text = bat(&fixture());
        assert!(text.starts_with("# Bat theme configuration\n"));
        assert!(text.contains("--theme=\"Midnight\""));
        assert!(text.contains("--style=\""));
        assert!(text.contains("--color=always"));
    }

    #[test]
    fn test_bat_escapes_quotes_in_name() {
        let mut theme = fixture();
        theme.name = "The \"Best\"\nTheme".to_string();
        let text = bat(&theme);
        assert!(text.contains(r#"--theme="The \"Best\" Theme""#), "{text}");
    }

    #[test]
    fn test_delta_section() {
        let text = delta(&fixture());
        assert!(text.contains("[delta]"));
        assert!(text.contains("line-numbers = true"));
        assert!(text.contains("side-by-side"));
        assert!(text.contains("file-style"));
        assert!(text.contains("hunk-header-style"));
        for key in ["plus-style", "minus-style"] {
            let line = text
                .lines()
                .find(|l| l.trim_start().starts_with(&format!("{key} =")))
                .unwrap();
            let value = line.split("syntax ").nth(1).unwrap().trim_end_matches('"');
            assert!(HexColor::parse(value).is_ok(), "{line}");
        }
    }

    #[test]
    fn test_zsh_styles() {
        let text = zsh(&fixture());
        assert!(text.starts_with('#'));
        let styles = text
            .lines()
            .filter(|l| l.starts_with("ZSH_HIGHLIGHT_STYLES["))
            .count();
        assert!(styles >= 13);
        assert!(text.contains("ZSH_HIGHLIGHT_STYLES[unknown-token]='fg=#f38ba8'"));
    }

    #[test]
    fn test_raycast_json() {
        let text = raycast(&fixture()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["name"], "Midnight");
        assert_eq!(value["author"], "Test Suite");
        for key in ["background", "text", "selection", "accent"] {
            let color = value["colors"][key].as_str().unwrap();
            assert!(HexColor::parse(color).is_ok());
        }
    }

    #[test]
    fn test_starship_toml() {
        let text = starship(&fixture()).unwrap();
        let value: toml::Value = toml::from_str(&text).unwrap();
        assert!(value.get("format").is_some());
        for module in ["directory", "git_branch", "git_status"] {
            assert!(value[module]["style"].as_str().is_some(), "{module}");
        }
    }
}
