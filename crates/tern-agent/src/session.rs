//! The dispatcher-owned agent session handle.
//!
//! Session-scoped commands are grouped server-side under one client-generated
//! id. The handle is owned by the dispatcher instance and created lazily on
//! the first session-scoped command; there is no global session state.

use tern_core::CommandName;

/// One routed session action, for the client-side activity view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRecord {
    pub command: CommandName,
    pub success: bool,
}

/// A live agent session id plus the actions routed through it.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: String,
    history: Vec<ActionRecord>,
}

impl SessionHandle {
    /// Generate a fresh session id from a timestamp plus a random suffix.
    pub fn generate() -> Self {
        let suffix: String = uuid::Uuid::new_v4().simple().to_string();
        Self {
            id: format!(
                "agent-{}-{}",
                chrono::Utc::now().timestamp_millis(),
                &suffix[..8]
            ),
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn record(&mut self, command: CommandName, success: bool) {
        self.history.push(ActionRecord { command, success });
    }

    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }
}
