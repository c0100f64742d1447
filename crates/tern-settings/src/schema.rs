//! Settings schema definitions for Tern configuration.
//!
//! All settings structs use `#[serde(default)]` to allow partial
//! configuration files. Missing fields are filled with sensible defaults.

use serde::{Deserialize, Serialize};

/// Logging level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        write!(f, "{}", s)
    }
}

/// Defaults applied to `search_files` parameters the LLM left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub max_results: usize,
    pub recursive: bool,
    pub case_sensitive: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: 20,
            recursive: true,
            case_sensitive: false,
        }
    }
}

/// Caps for rendered result tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Maximum process rows shown before the "+N more" footer.
    pub process_rows: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { process_rows: 20 }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevel,
}

/// Root settings for the Tern client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TernSettings {
    pub search: SearchSettings,
    pub display: DisplaySettings,
    pub logging: LoggingSettings,
}
