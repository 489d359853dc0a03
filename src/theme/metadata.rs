//! Theme metadata (`theme.json`) and name slugs.

use super::palette::{ColorPalette, HexColor};
use crate::error::{Result, ThemeError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// File name of the metadata document inside every Theme Directory.
pub const THEME_FILE: &str = "theme.json";

/// The contents of `theme.json`: a palette plus descriptive fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeMetadata {
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub colors: ColorPalette,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl ThemeMetadata {
    /// Parse and validate a `theme.json` document.
    ///
    /// A missing or malformed colour is reported with the key that caused it.
    pub fn from_json(text: &str) -> Result<Self> {
        let invalid = |e: serde_json::Error| {
            ThemeError::Validation(format!("invalid theme definition: {e}"))
        };
        let value: Value = serde_json::from_str(text).map_err(invalid)?;
        if let Some(colors) = value.get("colors").and_then(Value::as_object) {
            for (key, color) in colors {
                check_color(key, color)?;
            }
        }
        let meta: Self = serde_json::from_value(value).map_err(invalid)?;
        meta.validate()?;
        Ok(meta)
    }

    /// Serialize to the canonical on-disk form (pretty JSON, trailing newline).
    pub fn to_json(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(self).map_err(|e| ThemeError::Generate {
            integration: "theme.json",
            message: e.to_string(),
        })?;
        text.push('\n');
        Ok(text)
    }

    /// Check the fields the type system cannot.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ThemeError::Validation(
                "theme name must not be empty".to_string(),
            ));
        }
        if slugify(&self.name).is_empty() {
            return Err(ThemeError::Validation(format!(
                "theme name '{}' has no letters or digits to build a directory name from",
                self.name
            )));
        }
        Ok(())
    }

    /// Directory name for this theme.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Whether the palette reads as a light theme.
    pub fn is_light(&self) -> bool {
        self.colors.is_light()
    }
}

fn check_color(key: &str, color: &Value) -> Result<()> {
    let reason = match color.as_str() {
        Some(text) => match HexColor::parse(text) {
            Ok(_) => return Ok(()),
            Err(e) => e.to_string(),
        },
        None => format!("expected a \"#RRGGBB\" string, found {color}"),
    };
    Err(ThemeError::Validation(format!(
        "invalid theme definition: colors.{key}: {reason}"
    )))
}

/// Turn a display name into a directory name: lower-case ASCII letters and
/// digits separated by single hyphens.
///
/// `"Catppuccin Mocha"` → `"catppuccin-mocha"`, `"  Tokyo--Night! "` → `"tokyo-night"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Collapse a free-form string onto one line for use inside generated comments.
pub(crate) fn single_line(text: &str) -> String {
    text.split(['\r', '\n']).collect::<Vec<_>>().join(" ")
}
