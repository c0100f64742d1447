//! The external backend seam.
//!
//! The native backend process is an opaque collaborator: the client invokes
//! named operations and listens for pushed events. Everything the protocol
//! core needs from it is captured by [`AgentBackend`] so tests can stand in
//! a scripted implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::events::ChatEvent;
use crate::result::{DirectoryContents, SearchHit};

/// Error from a backend invocation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    /// The backend ran the operation and rejected or failed it.
    #[error("{0}")]
    Operation(String),
    /// The backend process could not be reached at all.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Parameters for a `search_files` call, after dispatcher defaulting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchQuery {
    pub directory_path: String,
    pub pattern: String,
    pub file_extension: Option<String>,
    pub case_sensitive: bool,
    pub recursive: bool,
    pub max_results: usize,
}

/// Envelope returned by `execute_agent_action`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionOutcome {
    pub success: bool,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Named operations exposed by the external backend process.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    async fn get_current_directory(&self) -> Result<String, BackendError>;

    async fn read_directory(
        &self,
        directory_path: &str,
        recursive: bool,
    ) -> Result<DirectoryContents, BackendError>;

    async fn read_file(&self, file_path: &str) -> Result<String, BackendError>;

    /// Returns a human-readable acknowledgement.
    async fn write_file(&self, path: &str, content: &str) -> Result<String, BackendError>;

    async fn search_files(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, BackendError>;

    async fn open_file_with_default_app(&self, file_path: &str) -> Result<String, BackendError>;

    /// Idempotent: creates the session on first call, reuses it afterwards.
    async fn create_or_get_agent_session(&self, session_id: &str) -> Result<(), BackendError>;

    async fn execute_agent_action(
        &self,
        session_id: &str,
        action_type: &str,
        parameters: serde_json::Map<String, serde_json::Value>,
    ) -> Result<ActionOutcome, BackendError>;

    /// Answer a pending permission request by its callback id.
    async fn handle_permission_response(
        &self,
        callback_id: &str,
        approved: bool,
    ) -> Result<(), BackendError>;

    /// Subscribe to the backend's pushed event stream.
    fn subscribe(&self) -> broadcast::Receiver<ChatEvent>;
}
