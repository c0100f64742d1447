//! End-to-end flows: LLM text through dispatch, formatting, rendering, and
//! the permission gate, against a scripted backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tokio::sync::{broadcast, RwLock};

use tern::{
    AgentBackend, AgentMode, BackendError, ChatEvent, ChatState, PermissionLevel,
    PermissionRequest, RenderedBlock,
};
use tern_core::{ActionOutcome, DirectoryContents, FileEntry, SearchHit, SearchQuery};

struct ScriptedBackend {
    directory: DirectoryContents,
    permission_responses: Mutex<Vec<(String, bool)>>,
    events: broadcast::Sender<ChatEvent>,
}

impl ScriptedBackend {
    fn new() -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            directory: DirectoryContents {
                directories: vec![],
                files: vec![FileEntry {
                    name: "a.txt".to_string(),
                    is_directory: false,
                }],
            },
            permission_responses: Mutex::new(Vec::new()),
            events,
        }
    }

    fn emit(&self, event: ChatEvent) {
        let _ = self.events.send(event);
    }

    fn permission_responses(&self) -> Vec<(String, bool)> {
        self.permission_responses.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentBackend for ScriptedBackend {
    async fn get_current_directory(&self) -> Result<String, BackendError> {
        Ok("/home/user".to_string())
    }

    async fn read_directory(
        &self,
        _directory_path: &str,
        _recursive: bool,
    ) -> Result<DirectoryContents, BackendError> {
        Ok(self.directory.clone())
    }

    async fn read_file(&self, file_path: &str) -> Result<String, BackendError> {
        Err(BackendError::Operation(format!(
            "File does not exist: {}",
            file_path
        )))
    }

    async fn write_file(&self, path: &str, _content: &str) -> Result<String, BackendError> {
        Ok(format!("Successfully wrote to {}", path))
    }

    async fn search_files(&self, _query: &SearchQuery) -> Result<Vec<SearchHit>, BackendError> {
        Ok(vec![])
    }

    async fn open_file_with_default_app(&self, file_path: &str) -> Result<String, BackendError> {
        Ok(format!("Opened {} with default application", file_path))
    }

    async fn create_or_get_agent_session(&self, _session_id: &str) -> Result<(), BackendError> {
        Ok(())
    }

    async fn execute_agent_action(
        &self,
        _session_id: &str,
        action_type: &str,
        parameters: Map<String, Value>,
    ) -> Result<ActionOutcome, BackendError> {
        let result = match action_type {
            "execute_command" => {
                let command = parameters
                    .get("command")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                json!({
                    "stdout": format!("ran '{}'\n", command),
                    "stderr": "",
                    "exit_code": 0,
                    "success": true
                })
            }
            other => Value::String(format!("Successfully executed {}", other)),
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

fn permission_request(operation: &str, callback_id: &str) -> PermissionRequest {
    PermissionRequest {
        operation: operation.to_string(),
        description: format!("{} description", operation),
        level: PermissionLevel::Moderate,
        details: HashMap::new(),
        callback_id: Some(callback_id.to_string()),
    }
}

#[tokio::test]
async fn directory_listing_renders_file_list_component() {
    let backend = Arc::new(ScriptedBackend::new());
    let agent = AgentMode::new(backend);

    let text = r#"List files. [EXECUTE:{"command":"read_directory","params":{"directoryPath":"/tmp"}}]"#;
    let processed = agent.process_response(text).await;

    assert!(processed.contains("1 files"));
    assert!(processed.contains("0 directories"));

    let blocks = agent.render(&processed);
    let file_list = blocks
        .iter()
        .find_map(|b| match b {
            RenderedBlock::FileList(data) => Some(data),
            _ => None,
        })
        .expect("file-list component");
    assert_eq!(file_list.files.len(), 1);
    assert_eq!(file_list.files[0].name, "a.txt");
    assert_eq!(file_list.directories.len(), 0);
}

#[tokio::test]
async fn quoted_command_output_survives_the_full_pipeline() {
    let backend = Arc::new(ScriptedBackend::new());
    let agent = AgentMode::new(backend);

    let text = r#"[EXECUTE:{"command":"execute_command","params":{"command":"echo 'quoted'"}}]"#;
    let processed = agent.process_response(text).await;

    let blocks = agent.render(&processed);
    match &blocks[0] {
        RenderedBlock::Command(block) => {
            assert!(!block.is_error());
            assert!(block.collapsed, "success blocks start collapsed");
            assert_eq!(block.copy_text(), Some("echo 'quoted'"));
            assert_eq!(block.data.stdout.as_deref(), Some("ran 'echo 'quoted''\n"));
        }
        other => panic!("unexpected block: {:?}", other),
    }
}

#[tokio::test]
async fn failed_command_renders_expanded_error_block() {
    let backend = Arc::new(ScriptedBackend::new());
    let agent = AgentMode::new(backend);

    let text = r#"[EXECUTE:{"command":"read_file","params":{"filePath":"/nope"}}]"#;
    let processed = agent.process_response(text).await;

    let blocks = agent.render(&processed);
    match &blocks[0] {
        RenderedBlock::Command(block) => {
            assert!(block.is_error());
            assert!(!block.collapsed, "error blocks start expanded");
        }
        other => panic!("unexpected block: {:?}", other),
    }
}

#[tokio::test]
async fn permission_requests_flow_through_gate_to_backend() {
    let backend = Arc::new(ScriptedBackend::new());
    let agent = AgentMode::new(backend.clone());
    let state = Arc::new(RwLock::new(ChatState::new()));
    let _subscription = agent.watch_chat("chat-1", state);

    let gate = agent.gate();
    let mut shown = gate.subscribe();

    backend.emit(ChatEvent::PermissionRequested {
        request: permission_request("Execute Terminal Command", "cb-1"),
    });
    backend.emit(ChatEvent::PermissionRequested {
        request: permission_request("Kill Process", "cb-2"),
    });

    // First request becomes visible; second queues behind it.
    tokio::time::timeout(Duration::from_secs(1), shown.changed())
        .await
        .expect("first request shown")
        .unwrap();
    assert_eq!(
        shown.borrow().as_ref().unwrap().operation,
        "Execute Terminal Command"
    );

    // Wait for the second push to land in the queue, then approve the first.
    for _ in 0..100 {
        if gate.queued().await == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    assert_eq!(gate.queued().await, 1);

    gate.resolve(true).await.unwrap();
    assert_eq!(shown.borrow_and_update().as_ref().unwrap().operation, "Kill Process");

    gate.resolve(false).await.unwrap();
    assert!(shown.borrow_and_update().is_none());

    assert_eq!(
        backend.permission_responses(),
        vec![("cb-1".to_string(), true), ("cb-2".to_string(), false)]
    );
}
