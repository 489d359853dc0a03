//! Editor generators: VS Code and Neovim.

use super::{serialize_error, Integration};
use crate::error::Result;
use crate::theme::{single_line, slugify, ColorPalette, HexColor, ThemeMetadata};
use serde_json::{json, Map, Value};
use std::fmt::Write;

/// `workbench.colorCustomizations` for a palette.
pub(super) fn workbench_colors(c: &ColorPalette) -> Value {
    let entries: [(&str, HexColor); 45] = [
        ("editor.background", c.background),
        ("editor.foreground", c.foreground),
        ("editor.selectionBackground", c.selection),
        ("editor.lineHighlightBackground", c.border),
        ("editorCursor.foreground", c.cursor),
        ("editorLineNumber.foreground", c.bright_black),
        ("editorLineNumber.activeForeground", c.foreground),
        ("editorGroup.border", c.border),
        ("activityBar.background", c.background),
        ("activityBar.foreground", c.foreground),
        ("activityBarBadge.background", c.accent),
        ("sideBar.background", c.background),
        ("sideBar.foreground", c.foreground),
        ("sideBar.border", c.border),
        ("statusBar.background", c.background),
        ("statusBar.foreground", c.foreground),
        ("statusBar.border", c.border),
        ("titleBar.activeBackground", c.background),
        ("titleBar.activeForeground", c.foreground),
        ("tab.activeBackground", c.background),
        ("tab.inactiveBackground", c.border),
        ("tab.activeBorderTop", c.accent),
        ("focusBorder", c.accent),
        ("button.background", c.accent),
        ("button.foreground", c.background),
        ("terminal.background", c.background),
        ("terminal.foreground", c.foreground),
        ("terminalCursor.foreground", c.cursor),
        ("terminal.selectionBackground", c.selection),
        ("terminal.ansiBlack", c.black),
        ("terminal.ansiRed", c.red),
        ("terminal.ansiGreen", c.green),
        ("terminal.ansiYellow", c.yellow),
        ("terminal.ansiBlue", c.blue),
        ("terminal.ansiMagenta", c.magenta),
        ("terminal.ansiCyan", c.cyan),
        ("terminal.ansiWhite", c.white),
        ("terminal.ansiBrightBlack", c.bright_black),
        ("terminal.ansiBrightRed", c.bright_red),
        ("terminal.ansiBrightGreen", c.bright_green),
        ("terminal.ansiBrightYellow", c.bright_yellow),
        ("terminal.ansiBrightBlue", c.bright_blue),
        ("terminal.ansiBrightMagenta", c.bright_magenta),
        ("terminal.ansiBrightCyan", c.bright_cyan),
        ("terminal.ansiBrightWhite", c.bright_white),
    ];
    let map: Map<String, Value> = entries
        .into_iter()
        .map(|(key, color)| (key.to_string(), Value::String(color.to_string())))
        .collect();
    Value::Object(map)
}

fn token_rules(c: &ColorPalette) -> Value {
    let rule = |scope: &[&str], color| json!({ "scope": scope, "settings": { "foreground": color } });
    json!([
        rule(&["comment", "punctuation.definition.comment"], c.bright_black),
        rule(&["string", "string.quoted"], c.green),
        rule(&["constant.numeric", "constant.language"], c.yellow),
        rule(&["keyword", "storage.type", "storage.modifier"], c.magenta),
        rule(&["entity.name.function", "support.function"], c.blue),
        rule(&["entity.name.type", "support.type", "entity.name.class"], c.cyan),
        rule(&["variable", "variable.parameter"], c.foreground),
        rule(&["invalid", "invalid.illegal"], c.red),
    ])
}

pub(super) fn vscode(theme: &ThemeMetadata) -> Result<String> {
    let c = &theme.colors;
    let doc = json!({
        "name": theme.name,
        "type": if c.is_light() { "light" } else { "dark" },
        "workbench.colorCustomizations": workbench_colors(c),
        "editor.tokenColorCustomizations": {
            "textMateRules": token_rules(c),
        },
    });
    let mut out =
        serde_json::to_string_pretty(&doc).map_err(|e| serialize_error(Integration::Vscode, e))?;
    out.push('\n');
    Ok(out)
}

pub(super) fn neovim(theme: &ThemeMetadata) -> String {
    let c = &theme.colors;
    let mut out = String::new();
    let _ = writeln!(out, "-- Neovim colorscheme: {}", single_line(&theme.name));
    out.push_str("-- Generated by chameleon. Load with :luafile or require().\n\n");
    out.push_str("vim.cmd('highlight clear')\n");
    out.push_str("if vim.fn.exists('syntax_on') == 1 then vim.cmd('syntax reset') end\n");
    let _ = writeln!(
        out,
        "vim.o.background = '{}'",
        if c.is_light() { "light" } else { "dark" }
    );
    out.push_str("vim.o.termguicolors = true\n");
    let _ = writeln!(out, "vim.g.colors_name = '{}'", slugify(&theme.name));
    out.push('\n');

    let groups: [(&str, String); 20] = [
        ("Normal", format!("guifg={} guibg={}", c.foreground, c.background)),
        ("Cursor", format!("guifg={} guibg={}", c.background, c.cursor)),
        ("Visual", format!("guibg={}", c.selection)),
        ("CursorLine", format!("guibg={}", c.border)),
        ("LineNr", format!("guifg={}", c.bright_black)),
        ("CursorLineNr", format!("guifg={} gui=bold", c.accent)),
        ("StatusLine", format!("guifg={} guibg={}", c.foreground, c.border)),
        ("StatusLineNC", format!("guifg={} guibg={}", c.bright_black, c.background)),
        ("VertSplit", format!("guifg={}", c.border)),
        ("Pmenu", format!("guifg={} guibg={}", c.foreground, c.border)),
        ("PmenuSel", format!("guifg={} guibg={}", c.background, c.accent)),
        ("Search", format!("guifg={} guibg={}", c.background, c.yellow)),
        ("Comment", format!("guifg={} gui=italic", c.bright_black)),
        ("String", format!("guifg={}", c.green)),
        ("Constant", format!("guifg={}", c.yellow)),
        ("Keyword", format!("guifg={}", c.magenta)),
        ("Function", format!("guifg={}", c.blue)),
        ("Type", format!("guifg={}", c.cyan)),
        ("Error", format!("guifg={}", c.red)),
        ("WarningMsg", format!("guifg={}", c.yellow)),
    ];
    for (group, attrs) in groups {
        let _ = writeln!(out, "vim.cmd('highlight {group} {attrs}')");
    }

    out.push('\n');
    for (i, color) in c.ansi().iter().enumerate() {
        let _ = writeln!(out, "vim.g.terminal_color_{i} = '{color}'");
    }
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
    fn test_vscode_json_has_customizations() {
        let text = vscode(&fixture()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        let colors = value["workbench.colorCustomizations"].as_object().unwrap();
        assert_eq!(colors["editor.background"], "#000000");
        assert_eq!(colors["terminal.ansiBrightRed"], "#f38ba8");
        assert!(value["editor.tokenColorCustomizations"]["textMateRules"].is_array());
        assert_eq!(value["type"], "dark");
    }

    #[test]
    fn test_workbench_colors_cover_every_key() {
        let c = &fixture().colors;
        let value = workbench_colors(c);
        let colors = value.as_object().unwrap();
        assert_eq!(colors.len(), 45);
        assert_eq!(colors["focusBorder"], c.accent.to_string());
        assert_eq!(colors["terminal.ansiBlack"], "#1e1e2e");
    }

    #[test]
    fn test_neovim_highlight_groups() {
        let text = neovim(&fixture());
        assert!(text.contains("vim.cmd('highlight Normal guifg=#ffffff guibg=#000000')"));
        assert!(text.contains("vim.cmd('highlight Cursor "));
        assert!(text.contains("vim.cmd('highlight Visual "));
        assert!(text.contains("vim.g.colors_name = 'midnight'"));
        assert!(text.contains("vim.g.terminal_color_15 = '#a6adc8'"));
    }
}
