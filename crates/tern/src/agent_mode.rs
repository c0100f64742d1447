//! The agent-mode facade.

use std::sync::Arc;

use tokio::sync::RwLock;

use tern_agent::CommandDispatcher;
use tern_core::AgentBackend;
use tern_hitl::PermissionGate;
use tern_render::{FormatOptions, RenderedBlock};
use tern_settings::TernSettings;

use crate::subscription::{ChatState, ChatSubscription};

/// Everything agent mode needs for one backend connection: the dispatcher
/// (with its lazily created session), format options, and the permission
/// gate.
pub struct AgentMode {
    backend: Arc<dyn AgentBackend>,
    dispatcher: CommandDispatcher,
    format_options: FormatOptions,
    gate: Arc<PermissionGate>,
}

impl AgentMode {
    pub fn new(backend: Arc<dyn AgentBackend>) -> Self {
        Self::with_settings(backend, &TernSettings::default())
    }

    pub fn with_settings(backend: Arc<dyn AgentBackend>, settings: &TernSettings) -> Self {
        let dispatcher = CommandDispatcher::new(backend.clone())
            .with_search_defaults(settings.search.clone());
        let format_options = FormatOptions {
            process_rows: settings.display.process_rows,
        };
        let gate = Arc::new(PermissionGate::new(backend.clone()));
        Self {
            backend,
            dispatcher,
            format_options,
            gate,
        }
    }

    /// Process one complete LLM response: dispatch every embedded command in
    /// textual order and splice the formatted results in.
    pub async fn process_response(&self, text: &str) -> String {
        tern_agent::process_response(&self.dispatcher, &self.format_options, text).await
    }

    /// Split processed message text into ordered render blocks.
    pub fn render(&self, text: &str) -> Vec<RenderedBlock> {
        tern_render::render_blocks(text)
    }

    pub fn gate(&self) -> Arc<PermissionGate> {
        self.gate.clone()
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    /// Subscribe the given chat's state to backend events. Dropping the
    /// returned subscription (e.g. when the active chat changes) stops
    /// delivery; permission requests keep flowing to the gate while the
    /// subscription lives.
    pub fn watch_chat(
        &self,
        chat_id: impl Into<String>,
        state: Arc<RwLock<ChatState>>,
    ) -> ChatSubscription {
        ChatSubscription::spawn(
            self.backend.subscribe(),
            chat_id,
            state,
            Some(self.gate.clone()),
        )
    }
}
