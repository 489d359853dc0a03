//! # Config Generators
//!
//! One pure function per supported application, mapping a [`ThemeMetadata`]
//! to that application's native config text.
//!
//! ## Supported Integrations
//!
//! | Integration | File | Format |
//! |-------------|------|--------|
//! | Alacritty | `alacritty.toml` | TOML, `colors.primary` / `colors.normal` / `colors.bright` |
//! | Kitty | `kitty.conf` | `key value` lines, `color0`..`color15` |
//! | Warp | `warp.yaml` | YAML, `terminal_colors.normal` / `.bright` |
//! | Hyper | `hyper.js` | `module.exports` object |
//! | iTerm2 | `iterm2.itermcolors` | XML property list |
//! | bat | `bat.conf` | CLI flags with comment header |
//! | delta | `delta.gitconfig` | gitconfig `[delta]` section |
//! | zsh | `zsh-theme.zsh` | `ZSH_HIGHLIGHT_STYLES` assignments |
//! | Raycast | `raycast.json` | JSON |
//! | Starship | `starship.toml` | TOML prompt config |
//! | VS Code | `vscode.json` | JSON `workbench.colorCustomizations` |
//! | Neovim | `neovim.lua` | Lua `vim.cmd` highlight calls |
//!
//! ## Contract
//!
//! Generators do no I/O and are deterministic: the same metadata always
//! produces byte-identical text. Because [`ThemeMetadata`] can only be built
//! from a complete, validated palette, a generator never sees a partial
//! palette; serialization failures surface as [`ThemeError::Generate`] and
//! no output is produced for any integration.

mod editor;
mod terminal;
mod tools;

use crate::error::{Result, ThemeError};
use crate::theme::ThemeMetadata;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A third-party application Chameleon writes config for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Integration {
    Alacritty,
    Kitty,
    Warp,
    Hyper,
    Iterm2,
    Bat,
    Delta,
    Zsh,
    Raycast,
    Starship,
    Vscode,
    Neovim,
}

impl Integration {
    /// Every supported integration, in generation order.
    pub const ALL: [Integration; 12] = [
        Integration::Alacritty,
        Integration::Kitty,
        Integration::Warp,
        Integration::Hyper,
        Integration::Iterm2,
        Integration::Bat,
        Integration::Delta,
        Integration::Zsh,
        Integration::Raycast,
        Integration::Starship,
        Integration::Vscode,
        Integration::Neovim,
    ];

    /// Stable identifier used in preferences and logs.
    pub fn id(self) -> &'static str {
        match self {
            Integration::Alacritty => "alacritty",
            Integration::Kitty => "kitty",
            Integration::Warp => "warp",
            Integration::Hyper => "hyper",
            Integration::Iterm2 => "iterm2",
            Integration::Bat => "bat",
            Integration::Delta => "delta",
            Integration::Zsh => "zsh",
            Integration::Raycast => "raycast",
            Integration::Starship => "starship",
            Integration::Vscode => "vscode",
            Integration::Neovim => "neovim",
        }
    }

    /// Look an integration up by its identifier (case-insensitive).
    pub fn from_id(id: &str) -> Option<Integration> {
        Integration::ALL
            .into_iter()
            .find(|i| i.id().eq_ignore_ascii_case(id))
    }

    /// File name inside a Theme Directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Integration::Alacritty => "alacritty.toml",
            Integration::Kitty => "kitty.conf",
            Integration::Warp => "warp.yaml",
            Integration::Hyper => "hyper.js",
            Integration::Iterm2 => "iterm2.itermcolors",
            Integration::Bat => "bat.conf",
            Integration::Delta => "delta.gitconfig",
            Integration::Zsh => "zsh-theme.zsh",
            Integration::Raycast => "raycast.json",
            Integration::Starship => "starship.toml",
            Integration::Vscode => "vscode.json",
            Integration::Neovim => "neovim.lua",
        }
    }

    /// Render this integration's config for `theme`.
    pub fn generate(self, theme: &ThemeMetadata) -> Result<String> {
        match self {
            Integration::Alacritty => terminal::alacritty(theme),
            Integration::Kitty => Ok(terminal::kitty(theme)),
            Integration::Warp => terminal::warp(theme),
            Integration::Hyper => Ok(terminal::hyper(theme)),
            Integration::Iterm2 => Ok(terminal::iterm2(theme)),
            Integration::Bat => Ok(tools::bat(theme)),
            Integration::Delta => Ok(tools::delta(theme)),
            Integration::Zsh => Ok(tools::zsh(theme)),
            Integration::Raycast => tools::raycast(theme),
            Integration::Starship => tools::starship(theme),
            Integration::Vscode => editor::vscode(theme),
            Integration::Neovim => Ok(editor::neovim(theme)),
        }
    }
}

impl fmt::Display for Integration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One rendered config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub integration: Integration,
    pub file_name: &'static str,
    pub contents: String,
}

/// Render every integration for `theme`.
///
/// Either all files are produced or none: the first failure aborts the batch.
pub fn generate_all(theme: &ThemeMetadata) -> Result<Vec<GeneratedFile>> {
    Integration::ALL
        .into_iter()
        .map(|integration| {
            Ok(GeneratedFile {
                integration,
                file_name: integration.file_name(),
                contents: integration.generate(theme)?,
            })
        })
        .collect()
}

/// VS Code `workbench.colorCustomizations` for `theme`, shared by the
/// generated `vscode.json` and live settings injection.
pub fn vscode_color_customizations(theme: &ThemeMetadata) -> serde_json::Value {
    editor::workbench_colors(&theme.colors)
}

fn serialize_error(integration: Integration, err: impl fmt::Display) -> ThemeError {
    ThemeError::Generate {
        integration: integration.id(),
        message: err.to_string(),
    }
}
