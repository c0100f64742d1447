//! Backend-to-client events.
//!
//! One tagged enum instead of per-event listener names; subscriptions filter
//! on the chat id so stale chats never receive another chat's stream.

use serde::{Deserialize, Serialize};

use crate::message::MessageRecord;
use crate::permission::PermissionRequest;

/// Events the backend pushes to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A message row was persisted (user side of a turn).
    MessageCreated { chat_id: String, message: MessageRecord },

    /// The assistant stream opened.
    StreamingStart { chat_id: String, message_id: String },

    /// Streaming snapshot: `content` is the entire accumulated text so far.
    StreamingChunk {
        chat_id: String,
        message_id: String,
        content: String,
    },

    /// The assistant stream closed.
    StreamingComplete { chat_id: String, message_id: String },

    /// The completed assistant message was persisted.
    FinalMessageCreated { chat_id: String, message: MessageRecord },

    /// The backend wants user approval before running an operation.
    /// Not scoped to a chat; the permission gate owns these.
    PermissionRequested { request: PermissionRequest },
}

impl ChatEvent {
    /// The chat this event belongs to, if it is chat-scoped.
    pub fn chat_id(&self) -> Option<&str> {
        match self {
            Self::MessageCreated { chat_id, .. }
            | Self::StreamingStart { chat_id, .. }
            | Self::StreamingChunk { chat_id, .. }
            | Self::StreamingComplete { chat_id, .. }
            | Self::FinalMessageCreated { chat_id, .. } => Some(chat_id),
            Self::PermissionRequested { .. } => None,
        }
    }
}
