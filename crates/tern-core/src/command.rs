//! Command name enumeration and the parsed command request.
//!
//! This module provides type-safe command name handling through the
//! `CommandName` enum, replacing string-based command names throughout the
//! codebase. The set is closed: a token naming anything outside this enum
//! fails fast at dispatch instead of silently doing nothing.

use serde::{Deserialize, Serialize};

/// Enumeration of all commands the agent protocol recognizes.
///
/// Session-scoped commands route through a backend agent session that keeps
/// a running history of executed actions; stateless commands call their
/// backend operation directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandName {
    // === Session-scoped ===
    /// Execute a shell command
    ExecuteCommand,
    /// Launch a desktop application
    LaunchApplication,
    /// List installed applications
    GetInstalledApps,
    /// List running processes
    GetProcesses,
    /// Terminate a process by pid
    KillProcess,
    /// Change the session working directory
    ChangeDirectory,
    /// Copy/move/delete/rename/mkdir
    FileOperation,

    // === Stateless ===
    /// Current working directory of the backend
    GetCurrentDirectory,
    /// List directory contents
    ReadDirectory,
    /// Read a text file
    ReadFile,
    /// Write contents to a file
    WriteFile,
    /// Search file contents with regex
    SearchFiles,
    /// Open a path with the default system application
    OpenFileWithDefaultApp,
}

impl CommandName {
    /// Get the string representation of the command name.
    ///
    /// This returns the exact string the LLM embeds in command tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExecuteCommand => "execute_command",
            Self::LaunchApplication => "launch_application",
            Self::GetInstalledApps => "get_installed_apps",
            Self::GetProcesses => "get_processes",
            Self::KillProcess => "kill_process",
            Self::ChangeDirectory => "change_directory",
            Self::FileOperation => "file_operation",
            Self::GetCurrentDirectory => "get_current_directory",
            Self::ReadDirectory => "read_directory",
            Self::ReadFile => "read_file",
            Self::WriteFile => "write_file",
            Self::SearchFiles => "search_files",
            Self::OpenFileWithDefaultApp => "open_file_with_default_app",
        }
    }

    /// Parse a command name from a string.
    ///
    /// Returns `None` for unknown names; the dispatcher turns that into an
    /// explicit unknown-command error rather than a silent no-op.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "execute_command" => Some(Self::ExecuteCommand),
            "launch_application" => Some(Self::LaunchApplication),
            "get_installed_apps" => Some(Self::GetInstalledApps),
            "get_processes" => Some(Self::GetProcesses),
            "kill_process" => Some(Self::KillProcess),
            "change_directory" => Some(Self::ChangeDirectory),
            "file_operation" => Some(Self::FileOperation),
            "get_current_directory" => Some(Self::GetCurrentDirectory),
            "read_directory" => Some(Self::ReadDirectory),
            "read_file" => Some(Self::ReadFile),
            "write_file" => Some(Self::WriteFile),
            "search_files" => Some(Self::SearchFiles),
            "open_file_with_default_app" => Some(Self::OpenFileWithDefaultApp),
            _ => None,
        }
    }

    /// Whether this command requires a backend agent session.
    pub fn is_session_scoped(&self) -> bool {
        matches!(
            self,
            Self::ExecuteCommand
                | Self::LaunchApplication
                | Self::GetInstalledApps
                | Self::GetProcesses
                | Self::KillProcess
                | Self::ChangeDirectory
                | Self::FileOperation
        )
    }

    /// Check if this command only reads state.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::GetCurrentDirectory
                | Self::ReadDirectory
                | Self::ReadFile
                | Self::SearchFiles
                | Self::GetInstalledApps
                | Self::GetProcesses
        )
    }
}

impl std::fmt::Display for CommandName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for CommandName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// A command request parsed out of an `[EXECUTE:{...}]` token.
///
/// `command` stays a string here; resolution against [`CommandName`] happens
/// at dispatch so an unknown name can be reported with its original text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandRequest {
    pub command: String,
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl CommandRequest {
    /// Resolve the request's command string against the known command set.
    pub fn name(&self) -> Option<CommandName> {
        CommandName::parse(&self.command)
    }
}
