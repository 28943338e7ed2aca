//! Assembly settings
//!
//! Implements the 3-layer settings merge:
//! 1. Built-in defaults
//! 2. Settings file (webpack-parts.toml)
//! 3. CLI flags

mod defaults;
mod effective;

pub use defaults::{
    AssemblySettings, DevServerSettings, HtmlSettings, LibrarySettings, PathSettings,
};
pub use effective::{EffectiveSettings, SettingsError, SettingsOrigin, SettingsSource};

/// Settings file picked up from the working directory when none is given
pub const DEFAULT_SETTINGS_FILE: &str = "webpack-parts.toml";
