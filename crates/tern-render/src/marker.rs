//! Component marker codec.
//!
//! Markers embed a JSON payload in a single-quoted attribute of an HTML-like
//! tag, e.g. `<file-list data='{"files":[...]}'></file-list>`. Because the
//! attribute is single-quoted, payloads must escape single quotes (and the
//! ampersands that escaping introduces) so the marker survives string
//! concatenation and re-parses to the original payload exactly.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use tern_core::FileEntry;

/// The two marker kinds the renderer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// `<file-list data='…'></file-list>`
    FileList,
    /// `<command data='…'></command>`
    Command,
}

impl MarkerKind {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::FileList => "file-list",
            Self::Command => "command",
        }
    }
}

/// A marker located in final message text.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerMatch {
    pub kind: MarkerKind,
    /// Byte offset of `<` in the source text.
    pub start: usize,
    /// Byte offset one past `>` of the closing tag.
    pub end: usize,
    /// Unescaped payload JSON.
    pub payload: String,
}

/// Payload of a `file-list` marker.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileListData {
    #[serde(default)]
    pub directories: Vec<FileEntry>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(rename = "basePath", default)]
    pub base_path: String,
}

/// Payload of a `command` marker.
///
/// Only `status` is always present; the rest depends on which command the
/// marker came from (shell output, generic result, or an error).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandBlockData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandBlockData {
    pub const STATUS_SUCCESS: &'static str = "success";
    pub const STATUS_ERROR: &'static str = "error";

    pub fn is_error(&self) -> bool {
        self.status == Self::STATUS_ERROR
    }
}

/// Escape a payload for embedding in a single-quoted attribute.
///
/// Ampersands first, then quotes; `unescape_attr` reverses in the opposite
/// order so a payload that already contains `&#39;` round-trips too.
pub fn escape_attr(payload: &str) -> String {
    payload.replace('&', "&amp;").replace('\'', "&#39;")
}

/// Reverse of [`escape_attr`].
pub fn unescape_attr(attr: &str) -> String {
    attr.replace("&#39;", "'").replace("&amp;", "&")
}

/// Build a marker string for the given kind and payload.
pub fn encode<T: Serialize>(kind: MarkerKind, payload: &T) -> String {
    let json = serde_json::to_string(payload).unwrap_or_default();
    let tag = kind.tag();
    format!("<{} data='{}'></{}>", tag, escape_attr(&json), tag)
}

fn file_list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<file-list data='([^']*)'></file-list>").expect("file-list marker pattern")
    })
}

fn command_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<command data='([^']*)'></command>").expect("command marker pattern")
    })
}

/// Find all markers of both kinds, ordered by start offset in the source
/// text, not by discovery order within each kind.
pub fn find_markers(text: &str) -> Vec<MarkerMatch> {
    let mut markers: Vec<MarkerMatch> = Vec::new();

    for caps in file_list_re().captures_iter(text) {
        if let (Some(whole), Some(attr)) = (caps.get(0), caps.get(1)) {
            markers.push(MarkerMatch {
                kind: MarkerKind::FileList,
                start: whole.start(),
                end: whole.end(),
                payload: unescape_attr(attr.as_str()),
            });
        }
    }

    for caps in command_re().captures_iter(text) {
        if let (Some(whole), Some(attr)) = (caps.get(0), caps.get(1)) {
            markers.push(MarkerMatch {
                kind: MarkerKind::Command,
                start: whole.start(),
                end: whole.end(),
                payload: unescape_attr(attr.as_str()),
            });
        }
    }

    markers.sort_by_key(|m| m.start);
    markers
}
