//! Chat message records and the in-flight streaming message model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message in the conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A persisted chat message as delivered by backend events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageRecord {
    pub id: String,
    pub chat_id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// An assistant message while its stream is still open.
///
/// Chunk events carry the entire accumulated text, not a delta; applying a
/// chunk replaces `content` wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamingMessage {
    pub id: String,
    pub content: String,
    pub is_streaming: bool,
    pub is_complete: bool,
}

impl StreamingMessage {
    /// Start an empty streaming message for `streaming_start`.
    pub fn begin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: String::new(),
            is_streaming: true,
            is_complete: false,
        }
    }

    /// Apply a full-content snapshot from `streaming_chunk`.
    pub fn apply_chunk(&mut self, full_content: &str) {
        self.content.clear();
        self.content.push_str(full_content);
    }

    /// Mark the stream closed on `streaming_complete`.
    pub fn complete(&mut self) {
        self.is_streaming = false;
        self.is_complete = true;
    }
}
