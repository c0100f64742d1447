//! Scoped chat event subscriptions.
//!
//! Backend events are a single broadcast stream; each active chat gets a
//! subscription that filters on its chat id and folds streaming events into
//! that chat's state. The subscription owns its listener task and aborts it
//! on drop, so switching chats cannot leak stale events into the new chat.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

use tern_core::{ChatEvent, MessageRecord, StreamingMessage};
use tern_hitl::PermissionGate;

/// One chat's view of the conversation: persisted messages plus any
/// assistant message still streaming.
#[derive(Debug, Default)]
pub struct ChatState {
    pub messages: Vec<MessageRecord>,
    pub streaming: HashMap<String, StreamingMessage>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A live listener bound to one chat id.
pub struct ChatSubscription {
    chat_id: String,
    task: JoinHandle<()>,
}

impl ChatSubscription {
    /// Spawn the listener task. Permission requests are global and go to the
    /// gate (when one is attached); all other events are dropped unless they
    /// carry this subscription's chat id.
    pub fn spawn(
        mut events: broadcast::Receiver<ChatEvent>,
        chat_id: impl Into<String>,
        state: Arc<RwLock<ChatState>>,
        gate: Option<Arc<PermissionGate>>,
    ) -> Self {
        let chat_id = chat_id.into();
        let task_chat_id = chat_id.clone();

        let task = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        handle_event(&task_chat_id, event, &state, gate.as_deref()).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("Chat {} subscription dropped {} events", task_chat_id, n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Self { chat_id, task }
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }
}

impl Drop for ChatSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle_event(
    chat_id: &str,
    event: ChatEvent,
    state: &Arc<RwLock<ChatState>>,
    gate: Option<&PermissionGate>,
) {
    if let ChatEvent::PermissionRequested { request } = event {
        if let Some(gate) = gate {
            gate.push(request).await;
        }
        return;
    }

    if event.chat_id() != Some(chat_id) {
        return;
    }

    let mut state = state.write().await;
    match event {
        ChatEvent::MessageCreated { message, .. } => state.messages.push(message),
        ChatEvent::StreamingStart { message_id, .. } => {
            state
                .streaming
                .insert(message_id.clone(), StreamingMessage::begin(message_id));
        }
        ChatEvent::StreamingChunk {
            message_id,
            content,
            ..
        } => {
            if let Some(message) = state.streaming.get_mut(&message_id) {
                message.apply_chunk(&content);
            }
        }
        ChatEvent::StreamingComplete { message_id, .. } => {
            if let Some(message) = state.streaming.get_mut(&message_id) {
                message.complete();
            }
        }
        ChatEvent::FinalMessageCreated { message, .. } => {
            // The persisted row supersedes the streaming placeholder.
            state.streaming.retain(|_, m| !m.is_complete);
            state.messages.push(message);
        }
        ChatEvent::PermissionRequested { .. } => {}
    }
}
