//! # Bundled Themes
//!
//! The themes that ship with Chameleon. They are written into the bundled
//! `themes/` root by [`crate::store::ThemeManager::install_bundled`] and are
//! read-only from then on.
//!
//! - **Catppuccin Mocha** - warm, dark pastel theme
//! - **Dracula** - dark theme with vivid colors
//! - **Nord** - arctic, north-bluish color palette
//! - **Solarized Light** - precision colors for machines and people

use super::metadata::ThemeMetadata;
use super::palette::{ColorPalette, HexColor};

/// A palette compiled into the binary.
#[derive(Debug, Clone)]
pub struct BundledTheme {
    /// Human-readable name; its slug is the directory name.
    pub name: &'static str,
    pub author: &'static str,
    pub description: &'static str,
    pub colors: ColorPalette,
}

impl BundledTheme {
    /// Return the list of all bundled themes.
    pub fn all() -> &'static [BundledTheme] {
        &BUNDLED_THEMES
    }

    /// Find a bundled theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<&'static BundledTheme> {
        BUNDLED_THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// The `theme.json` document for this theme.
    pub fn metadata(&self) -> ThemeMetadata {
        ThemeMetadata {
            name: self.name.to_string(),
            author: self.author.to_string(),
            description: self.description.to_string(),
            version: "1.0.0".to_string(),
            colors: self.colors.clone(),
        }
    }
}

const fn hex(v: u32) -> HexColor {
    HexColor::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

// ---------------------------------------------------------------------------
// Bundled theme definitions
// ---------------------------------------------------------------------------

static BUNDLED_THEMES: [BundledTheme; 4] = [
    BundledTheme {
        name: "Catppuccin Mocha",
        author: "Catppuccin",
        description: "Soothing pastel theme, darkest flavour",
        colors: ColorPalette {
            background: hex(0x1e1e2e),     // base
            foreground: hex(0xcdd6f4),     // text
            cursor: hex(0xf5e0dc),         // rosewater
            selection: hex(0x585b70),      // surface2
            black: hex(0x45475a),          // surface1
            red: hex(0xf38ba8),
            green: hex(0xa6e3a1),
            yellow: hex(0xf9e2af),
            blue: hex(0x89b4fa),
            magenta: hex(0xf5c2e7),        // pink
            cyan: hex(0x94e2d5),           // teal
            white: hex(0xbac2de),          // subtext1
            bright_black: hex(0x585b70),   // surface2
            bright_red: hex(0xf38ba8),
            bright_green: hex(0xa6e3a1),
            bright_yellow: hex(0xf9e2af),
            bright_blue: hex(0x89b4fa),
            bright_magenta: hex(0xf5c2e7),
            bright_cyan: hex(0x94e2d5),
            bright_white: hex(0xa6adc8),   // subtext0
            accent: hex(0x89b4fa),
            border: hex(0x313244),         // surface0
        },
    },
    BundledTheme {
        name: "Dracula",
        author: "Zeno Rocha",
        description: "Dark theme with vivid colors",
        colors: ColorPalette {
            background: hex(0x282a36),
            foreground: hex(0xf8f8f2),
            cursor: hex(0xf8f8f2),
            selection: hex(0x44475a),
            black: hex(0x21222c),
            red: hex(0xff5555),
            green: hex(0x50fa7b),
            yellow: hex(0xf1fa8c),
            blue: hex(0xbd93f9),
            magenta: hex(0xff79c6),
            cyan: hex(0x8be9fd),
            white: hex(0xf8f8f2),
            bright_black: hex(0x6272a4),
            bright_red: hex(0xff6e6e),
            bright_green: hex(0x69ff94),
            bright_yellow: hex(0xffffa5),
            bright_blue: hex(0xd6acff),
            bright_magenta: hex(0xff92df),
            bright_cyan: hex(0xa4ffff),
            bright_white: hex(0xffffff),
            accent: hex(0xbd93f9),
            border: hex(0x44475a),
        },
    },
    BundledTheme {
        name: "Nord",
        author: "Arctic Ice Studio",
        description: "Arctic, north-bluish color palette",
        colors: ColorPalette {
            background: hex(0x2e3440),     // nord0
            foreground: hex(0xd8dee9),     // nord4
            cursor: hex(0xd8dee9),
            selection: hex(0x434c5e),      // nord2
            black: hex(0x3b4252),
            red: hex(0xbf616a),
            green: hex(0xa3be8c),
            yellow: hex(0xebcb8b),
            blue: hex(0x81a1c1),
            magenta: hex(0xb48ead),
            cyan: hex(0x88c0d0),
            white: hex(0xe5e9f0),
            bright_black: hex(0x4c566a),
            bright_red: hex(0xbf616a),
            bright_green: hex(0xa3be8c),
            bright_yellow: hex(0xebcb8b),
            bright_blue: hex(0x81a1c1),
            bright_magenta: hex(0xb48ead),
            bright_cyan: hex(0x8fbcbb),
            bright_white: hex(0xeceff4),
            accent: hex(0x88c0d0),         // nord8
            border: hex(0x3b4252),
        },
    },
    BundledTheme {
        name: "Solarized Light",
        author: "Ethan Schoonover",
        description: "Precision colors for machines and people, light variant",
        colors: ColorPalette {
            background: hex(0xfdf6e3),     // base3
            foreground: hex(0x657b83),     // base00
            cursor: hex(0x586e75),
            selection: hex(0xeee8d5),      // base2
            black: hex(0x073642),
            red: hex(0xdc322f),
            green: hex(0x859900),
            yellow: hex(0xb58900),
            blue: hex(0x268bd2),
            magenta: hex(0xd33682),
            cyan: hex(0x2aa198),
            white: hex(0xeee8d5),
            bright_black: hex(0x002b36),
            bright_red: hex(0xcb4b16),     // orange
            bright_green: hex(0x586e75),
            bright_yellow: hex(0x657b83),
            bright_blue: hex(0x839496),
            bright_magenta: hex(0x6c71c4), // violet
            bright_cyan: hex(0x93a1a1),
            bright_white: hex(0xfdf6e3),
            accent: hex(0x268bd2),
            border: hex(0x93a1a1),
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::slugify;

    fn ctp(color: catppuccin::Color) -> HexColor {
        HexColor::rgb(color.rgb.r, color.rgb.g, color.rgb.b)
    }

    #[test]
    fn test_all_themes_count() {
        assert_eq!(BundledTheme::all().len(), 4);
    }

    #[test]
    fn test_by_name_case_insensitive() {
        assert!(BundledTheme::by_name("catppuccin mocha").is_some());
        assert!(BundledTheme::by_name("DRACULA").is_some());
        assert!(BundledTheme::by_name("nonexistent").is_none());
    }

    #[test]
    fn test_catppuccin_mocha_matches_palette() {
        let mocha = catppuccin::PALETTE.mocha.colors;
        let theme = BundledTheme::by_name("Catppuccin Mocha").expect("theme exists");
        assert_eq!(theme.colors.background, ctp(mocha.base));
        assert_eq!(theme.colors.foreground, ctp(mocha.text));
        assert_eq!(theme.colors.blue, ctp(mocha.blue));
        assert_eq!(theme.colors.yellow, ctp(mocha.yellow));
        assert_eq!(theme.colors.green, ctp(mocha.green));
        assert_eq!(theme.colors.red, ctp(mocha.red));
    }

    #[test]
    fn test_light_detection() {
        let solarized = BundledTheme::by_name("Solarized Light").expect("theme exists");
        assert!(solarized.colors.is_light());
        let nord = BundledTheme::by_name("Nord").expect("theme exists");
        assert!(!nord.colors.is_light());
    }

    #[test]
    fn test_all_themes_have_distinct_slugs() {
        let slugs: Vec<String> = BundledTheme::all().iter().map(|t| slugify(t.name)).collect();
        let mut unique = slugs.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(slugs.len(), unique.len(), "duplicate theme slugs found");
    }

    #[test]
    fn test_metadata_validates() {
        for theme in BundledTheme::all() {
            theme.metadata().validate().expect("bundled theme is valid");
        }
    }
}
