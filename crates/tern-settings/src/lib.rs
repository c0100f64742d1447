//! Centralized TOML-based settings for the Tern client.
//!
//! This crate provides configuration management for the agent protocol core:
//! - Loading settings from `~/.tern/settings.toml`
//! - Atomic file writes with temp file + rename
//! - Type-safe settings schema with serde defaults
//!
//! A missing or partial settings file is never an error; absent fields fall
//! back to their defaults.

pub mod schema;

pub use schema::{DisplaySettings, LogLevel, LoggingSettings, SearchSettings, TernSettings};

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Path of the settings file (`~/.tern/settings.toml`).
pub fn settings_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tern").join("settings.toml"))
}

/// Load settings from the default location, falling back to defaults when
/// the file is missing or unreadable.
pub fn load() -> TernSettings {
    match settings_path() {
        Some(path) => load_from(&path),
        None => TernSettings::default(),
    }
}

/// Load settings from an explicit path.
pub fn load_from(path: &std::path::Path) -> TernSettings {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Invalid settings file {}: {}", path.display(), e);
                TernSettings::default()
            }
        },
        Err(_) => TernSettings::default(),
    }
}

/// Persist settings atomically: write a temp file, then rename over the
/// target so readers never observe a half-written file.
pub fn save_to(settings: &TernSettings, path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let contents = toml::to_string_pretty(settings).context("Failed to serialize settings")?;

    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, contents)
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    tracing::debug!("Saved settings to {}", path.display());
    Ok(())
}
