//! Chameleon - one colour theme across terminals, editors, shells and launchers
//!
//! This library compiles a single palette (`theme.json`) into native config
//! files for every supported application, manages bundled and custom Theme
//! Directories on disk, and switches the active theme through a
//! `current/theme` symlink.

pub mod error;
pub mod generate;
pub mod integrations;
pub mod logging;
pub mod paths;
pub mod preferences;
pub mod store;
pub mod theme;
