//! Typed command results decoded at the dispatch boundary.
//!
//! Raw backend payloads are decoded into one tagged union here instead of
//! being shape-guessed downstream; the formatter matches on variants only.

use serde::{Deserialize, Serialize};

use crate::command::CommandName;

/// One entry of a directory listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileEntry {
    pub name: String,
    #[serde(default)]
    pub is_directory: bool,
}

/// Directory listing as returned by the backend's `read_directory`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DirectoryContents {
    #[serde(default)]
    pub directories: Vec<FileEntry>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// A single content-search hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub file_path: String,
    pub line_number: usize,
    pub line_content: String,
}

/// Captured output of a shell command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    #[serde(default)]
    pub success: bool,
}

/// A running process as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    /// Resident memory in kilobytes, when the platform reports it.
    pub memory_usage: Option<u64>,
    pub cpu_usage: Option<f32>,
}

/// An installed application as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppInfo {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Result of one dispatched command, tagged per command family.
///
/// Variants carry whatever context the formatter needs (the request path,
/// the command line) so formatting stays a pure function of this value.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// `read_directory`
    Directory {
        base_path: String,
        contents: DirectoryContents,
    },
    /// `read_file`
    FileContents { path: String, content: String },
    /// `search_files`
    SearchHits {
        pattern: String,
        hits: Vec<SearchHit>,
    },
    /// `execute_command`
    Command {
        command: String,
        working_directory: Option<String>,
        output: CommandOutput,
    },
    /// `get_processes`
    Processes(Vec<ProcessInfo>),
    /// `get_installed_apps`
    Applications(Vec<AppInfo>),
    /// Plain acknowledgement text (write_file, change_directory, ...).
    Message { command: CommandName, text: String },
    /// Anything the decoder does not special-case.
    Raw {
        command: CommandName,
        value: serde_json::Value,
    },
}
