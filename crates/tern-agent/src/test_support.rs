//! Scripted backend for dispatcher and response-processor tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tokio::sync::broadcast;

use tern_core::{
    ActionOutcome, AgentBackend, BackendError, ChatEvent, DirectoryContents, FileEntry,
    SearchHit, SearchQuery,
};

type Params = Map<String, Value>;

/// In-memory backend that records calls and answers with canned data.
pub struct MockBackend {
    directory: Mutex<DirectoryContents>,
    search_hits: Mutex<Vec<SearchHit>>,
    action_failure: Option<String>,
    read_directory_calls: Mutex<Vec<(String, bool)>>,
    search_queries: Mutex<Vec<SearchQuery>>,
    created_sessions: Mutex<Vec<String>>,
    action_calls: Mutex<Vec<(String, String, Params)>>,
    permission_responses: Mutex<Vec<(String, bool)>>,
    events: broadcast::Sender<ChatEvent>,
}

impl MockBackend {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            directory: Mutex::new(DirectoryContents::default()),
            search_hits: Mutex::new(Vec::new()),
            action_failure: None,
            read_directory_calls: Mutex::new(Vec::new()),
            search_queries: Mutex::new(Vec::new()),
            created_sessions: Mutex::new(Vec::new()),
            action_calls: Mutex::new(Vec::new()),
            permission_responses: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Make every `execute_agent_action` fail with the given message.
    pub fn failing_actions(mut self, message: &str) -> Self {
        self.action_failure = Some(message.to_string());
        self
    }

    pub fn with_directory(self, files: &[&str], directories: &[&str]) -> Self {
        *self.directory.lock().unwrap() = DirectoryContents {
            directories: directories
                .iter()
                .map(|name| FileEntry {
                    name: name.to_string(),
                    is_directory: true,
                })
                .collect(),
            files: files
                .iter()
                .map(|name| FileEntry {
                    name: name.to_string(),
                    is_directory: false,
                })
                .collect(),
        };
        self
    }

    pub fn read_directory_calls(&self) -> Vec<(String, bool)> {
        self.read_directory_calls.lock().unwrap().clone()
    }

    pub fn search_queries(&self) -> Vec<SearchQuery> {
        self.search_queries.lock().unwrap().clone()
    }

    pub fn created_sessions(&self) -> Vec<String> {
        self.created_sessions.lock().unwrap().clone()
    }

    pub fn action_calls(&self) -> Vec<(String, String, Params)> {
        self.action_calls.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn permission_responses(&self) -> Vec<(String, bool)> {
        self.permission_responses.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentBackend for MockBackend {
    async fn get_current_directory(&self) -> Result<String, BackendError> {
        Ok("/home/user".to_string())
    }

    async fn read_directory(
        &self,
        directory_path: &str,
        recursive: bool,
    ) -> Result<DirectoryContents, BackendError> {
        self.read_directory_calls
            .lock()
            .unwrap()
            .push((directory_path.to_string(), recursive));
        Ok(self.directory.lock().unwrap().clone())
    }

    async fn read_file(&self, file_path: &str) -> Result<String, BackendError> {
        Ok(format!("contents of {}", file_path))
    }

    async fn write_file(&self, path: &str, _content: &str) -> Result<String, BackendError> {
        Ok(format!("Successfully wrote to {}", path))
    }

    async fn search_files(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, BackendError> {
        self.search_queries.lock().unwrap().push(query.clone());
        Ok(self.search_hits.lock().unwrap().clone())
    }

    async fn open_file_with_default_app(&self, file_path: &str) -> Result<String, BackendError> {
        Ok(format!("Opened {} with default application", file_path))
    }

    async fn create_or_get_agent_session(&self, session_id: &str) -> Result<(), BackendError> {
        self.created_sessions
            .lock()
            .unwrap()
            .push(session_id.to_string());
        Ok(())
    }

    async fn execute_agent_action(
        &self,
        session_id: &str,
        action_type: &str,
        parameters: Params,
    ) -> Result<ActionOutcome, BackendError> {
        self.action_calls.lock().unwrap().push((
            session_id.to_string(),
            action_type.to_string(),
            parameters.clone(),
        ));

        if let Some(message) = &self.action_failure {
            return Ok(ActionOutcome {
                success: false,
                result: None,
                error_message: Some(message.clone()),
            });
        }

        let result = match action_type {
            "execute_command" => {
                json!({"stdout": "ok\n", "stderr": "", "exit_code": 0, "success": true})
            }
            "get_processes" => json!([]),
            "get_installed_apps" => json!([]),
            "change_directory" => Value::String(format!(
                "Changed directory to {}",
                parameters.get("path").and_then(Value::as_str).unwrap_or("?")
            )),
            "kill_process" => Value::String(format!(
                "Successfully terminated process with PID: {}",
                parameters.get("pid").and_then(Value::as_u64).unwrap_or(0)
            )),
            _ => json!({"message": format!("Successfully executed {}", action_type)}),
        };

        Ok(ActionOutcome {
            success: true,
            result: Some(result),
            error_message: None,
        })
    }

    async fn handle_permission_response(
        &self,
        callback_id: &str,
        approved: bool,
    ) -> Result<(), BackendError> {
        self.permission_responses
            .lock()
            .unwrap()
            .push((callback_id.to_string(), approved));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }
}
