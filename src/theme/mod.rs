//! # Theme Module
//!
//! The data model every other module builds on.
//!
//! ## Overview
//!
//! A theme is a [`ThemeMetadata`] record: a name, author, description and
//! version around a [`ColorPalette`] of 22 named colours. It is stored on
//! disk as `theme.json`:
//!
//! ```json
//! {
//!   "name": "Midnight",
//!   "author": "you",
//!   "description": "",
//!   "version": "1.0.0",
//!   "colors": { "background": "#000000", "foreground": "#ffffff", "...": "..." }
//! }
//! ```
//!
//! Validation is strict: every colour must be present and a 6-digit hex
//! value. Nothing is defaulted.

mod bundled;
mod metadata;
mod palette;

pub use bundled::BundledTheme;
pub use metadata::{slugify, ThemeMetadata, THEME_FILE};
pub(crate) use metadata::single_line;
pub use palette::{ColorPalette, HexColor, ANSI_NAMES};
