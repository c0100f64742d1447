//! Command dispatcher.
//!
//! Maps a parsed command request onto exactly one backend call, applying the
//! per-command parameter contract (defaults included) before the call and
//! decoding the raw payload into a typed [`CommandResult`] right at this
//! boundary. Session-scoped commands lazily create the dispatcher-owned
//! session handle and route through `execute_agent_action`.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::Mutex;

use tern_core::{
    AgentBackend, AppInfo, BackendError, CommandName, CommandOutput, CommandRequest,
    CommandResult, ProcessInfo, SearchQuery,
};
use tern_settings::SearchSettings;

use crate::error::AgentError;
use crate::session::{ActionRecord, SessionHandle};

type Params = Map<String, Value>;

/// Dispatches parsed command requests to the external backend.
pub struct CommandDispatcher {
    backend: Arc<dyn AgentBackend>,
    search_defaults: SearchSettings,
    session: Mutex<Option<SessionHandle>>,
}

impl CommandDispatcher {
    pub fn new(backend: Arc<dyn AgentBackend>) -> Self {
        Self {
            backend,
            search_defaults: SearchSettings::default(),
            session: Mutex::new(None),
        }
    }

    /// Override the `search_files` defaults (normally from settings).
    pub fn with_search_defaults(mut self, defaults: SearchSettings) -> Self {
        self.search_defaults = defaults;
        self
    }

    /// The current session id, if a session-scoped command already ran.
    pub async fn session_id(&self) -> Option<String> {
        let session = self.session.lock().await;
        session.as_ref().map(|s| s.id().to_string())
    }

    /// Actions routed through the session so far.
    pub async fn session_history(&self) -> Vec<ActionRecord> {
        let session = self.session.lock().await;
        session
            .as_ref()
            .map(|s| s.history().to_vec())
            .unwrap_or_default()
    }

    /// Execute one command request against the backend.
    pub async fn dispatch(&self, request: &CommandRequest) -> Result<CommandResult, AgentError> {
        let command = request
            .name()
            .ok_or_else(|| AgentError::UnknownCommand(request.command.clone()))?;

        tracing::debug!("Dispatching {}", command);

        if command.is_session_scoped() {
            self.dispatch_session(command, &request.params).await
        } else {
            self.dispatch_stateless(command, &request.params).await
        }
    }

    async fn dispatch_stateless(
        &self,
        command: CommandName,
        params: &Params,
    ) -> Result<CommandResult, AgentError> {
        match command {
            CommandName::GetCurrentDirectory => {
                let text = self
                    .backend
                    .get_current_directory()
                    .await
                    .map_err(|e| AgentError::classify(command, e))?;
                Ok(CommandResult::Message { command, text })
            }
            CommandName::ReadDirectory => {
                let path = required_str(command, params, &["directoryPath", "directory_path"])?;
                let recursive = optional_bool(params, &["recursive"]).unwrap_or(false);
                let contents = self
                    .backend
                    .read_directory(path, recursive)
                    .await
                    .map_err(|e| AgentError::classify(command, e))?;
                Ok(CommandResult::Directory {
                    base_path: path.to_string(),
                    contents,
                })
            }
            CommandName::ReadFile => {
                let path = required_str(command, params, &["filePath", "file_path", "path"])?;
                let content = self
                    .backend
                    .read_file(path)
                    .await
                    .map_err(|e| AgentError::classify(command, e))?;
                Ok(CommandResult::FileContents {
                    path: path.to_string(),
                    content,
                })
            }
            CommandName::WriteFile => {
                let path = required_str(command, params, &["path", "filePath", "file_path"])?;
                let content = required_str(command, params, &["content", "contents"])?;
                let text = self
                    .backend
                    .write_file(path, content)
                    .await
                    .map_err(|e| AgentError::classify(command, e))?;
                Ok(CommandResult::Message { command, text })
            }
            CommandName::SearchFiles => {
                let query = SearchQuery {
                    directory_path: required_str(
                        command,
                        params,
                        &["directoryPath", "directory_path", "directory"],
                    )?
                    .to_string(),
                    pattern: required_str(command, params, &["pattern"])?.to_string(),
                    file_extension: optional_str(params, &["fileExtension", "file_extension"])
                        .map(str::to_string),
                    case_sensitive: optional_bool(params, &["caseSensitive", "case_sensitive"])
                        .unwrap_or(self.search_defaults.case_sensitive),
                    recursive: optional_bool(params, &["recursive"])
                        .unwrap_or(self.search_defaults.recursive),
                    max_results: optional_u64(params, &["maxResults", "max_results"])
                        .map(|n| n as usize)
                        .unwrap_or(self.search_defaults.max_results),
                };
                let hits = self
                    .backend
                    .search_files(&query)
                    .await
                    .map_err(|e| AgentError::classify(command, e))?;
                Ok(CommandResult::SearchHits {
                    pattern: query.pattern,
                    hits,
                })
            }
            CommandName::OpenFileWithDefaultApp => {
                let path = required_str(command, params, &["filePath", "file_path", "path"])?;
                let text = self
                    .backend
                    .open_file_with_default_app(path)
                    .await
                    .map_err(|e| AgentError::classify(command, e))?;
                Ok(CommandResult::Message { command, text })
            }
            _ => Err(AgentError::UnknownCommand(command.as_str().to_string())),
        }
    }

    async fn dispatch_session(
        &self,
        command: CommandName,
        params: &Params,
    ) -> Result<CommandResult, AgentError> {
        let action_params = normalize_session_params(command, params)?;
        let session_id = self.ensure_session(command).await?;

        let outcome = match self
            .backend
            .execute_agent_action(&session_id, command.as_str(), action_params)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                self.record(command, false).await;
                return Err(AgentError::classify(command, e));
            }
        };

        if !outcome.success {
            self.record(command, false).await;
            let message = outcome
                .error_message
                .unwrap_or_else(|| "agent action failed".to_string());
            return Err(AgentError::classify(command, BackendError::Operation(message)));
        }

        self.record(command, true).await;
        Ok(decode_action_result(command, params, outcome.result))
    }

    /// Create the session on first use; reuse it afterwards.
    async fn ensure_session(&self, command: CommandName) -> Result<String, AgentError> {
        let mut session = self.session.lock().await;
        if let Some(handle) = session.as_ref() {
            return Ok(handle.id().to_string());
        }

        let handle = SessionHandle::generate();
        self.backend
            .create_or_get_agent_session(handle.id())
            .await
            .map_err(|e| AgentError::classify(command, e))?;

        let id = handle.id().to_string();
        *session = Some(handle);
        Ok(id)
    }

    async fn record(&self, command: CommandName, success: bool) {
        let mut session = self.session.lock().await;
        if let Some(handle) = session.as_mut() {
            handle.record(command, success);
        }
    }
}

/// Decode a session action's `result` payload into the typed union.
///
/// Shapes the decoder does not recognize degrade to the generic variants so
/// the formatter can still wrap them verbatim.
fn decode_action_result(
    command: CommandName,
    params: &Params,
    result: Option<Value>,
) -> CommandResult {
    let value = match result {
        Some(value) => value,
        None => {
            return CommandResult::Message {
                command,
                text: format!("Successfully executed {}", command),
            }
        }
    };

    match command {
        CommandName::ExecuteCommand => {
            match serde_json::from_value::<CommandOutput>(value.clone()) {
                Ok(output) => CommandResult::Command {
                    command: optional_str(params, &["command"]).unwrap_or_default().to_string(),
                    working_directory: optional_str(
                        params,
                        &["workingDirectory", "working_directory"],
                    )
                    .map(str::to_string),
                    output,
                },
                Err(_) => CommandResult::Raw { command, value },
            }
        }
        CommandName::GetProcesses => {
            match serde_json::from_value::<Vec<ProcessInfo>>(value.clone()) {
                Ok(processes) => CommandResult::Processes(processes),
                Err(_) => CommandResult::Raw { command, value },
            }
        }
        CommandName::GetInstalledApps => {
            match serde_json::from_value::<Vec<AppInfo>>(value.clone()) {
                Ok(apps) => CommandResult::Applications(apps),
                Err(_) => CommandResult::Raw { command, value },
            }
        }
        _ => {
            if let Value::String(text) = value {
                return CommandResult::Message { command, text };
            }
            let message = value
                .as_object()
                .and_then(|map| map.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string);
            match message {
                Some(text) => CommandResult::Message { command, text },
                None => CommandResult::Raw { command, value },
            }
        }
    }
}

/// Build the snake_case parameter map `execute_agent_action` expects,
/// validating required keys.
fn normalize_session_params(command: CommandName, params: &Params) -> Result<Params, AgentError> {
    let mut out = Params::new();

    match command {
        CommandName::ExecuteCommand => {
            let cmd = required_str(command, params, &["command"])?;
            out.insert("command".into(), Value::String(cmd.to_string()));
            if let Some(dir) = optional_str(params, &["workingDirectory", "working_directory"]) {
                out.insert("working_directory".into(), Value::String(dir.to_string()));
            }
        }
        CommandName::LaunchApplication => {
            let path = required_str(command, params, &["path", "appPath", "app_path"])?;
            out.insert("path".into(), Value::String(path.to_string()));
            if let Some(args) = lookup(params, &["arguments", "args"]) {
                out.insert("arguments".into(), args.clone());
            }
        }
        CommandName::GetInstalledApps | CommandName::GetProcesses => {}
        CommandName::KillProcess => {
            let pid = optional_u64(params, &["pid"]).ok_or_else(|| missing(command, "pid"))?;
            out.insert("pid".into(), Value::from(pid));
        }
        CommandName::ChangeDirectory => {
            let path =
                required_str(command, params, &["path", "directoryPath", "directory_path"])?;
            out.insert("path".into(), Value::String(path.to_string()));
        }
        CommandName::FileOperation => {
            let operation = required_str(command, params, &["operationType", "operation_type"])?;
            out.insert(
                "operation_type".into(),
                Value::String(operation.to_string()),
            );
            let source = required_str(command, params, &["source"])?;
            out.insert("source".into(), Value::String(source.to_string()));
            if let Some(dest) = optional_str(params, &["destination"]) {
                out.insert("destination".into(), Value::String(dest.to_string()));
            }
            let recursive = optional_bool(params, &["recursive"]).unwrap_or(false);
            out.insert("recursive".into(), Value::Bool(recursive));
        }
        _ => {}
    }

    Ok(out)
}

fn lookup<'a>(params: &'a Params, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| params.get(*key))
}

fn required_str<'a>(
    command: CommandName,
    params: &'a Params,
    keys: &[&str],
) -> Result<&'a str, AgentError> {
    lookup(params, keys)
        .and_then(Value::as_str)
        .ok_or_else(|| missing(command, keys[0]))
}

fn optional_str<'a>(params: &'a Params, keys: &[&str]) -> Option<&'a str> {
    lookup(params, keys).and_then(Value::as_str)
}

fn optional_bool(params: &Params, keys: &[&str]) -> Option<bool> {
    lookup(params, keys).and_then(Value::as_bool)
}

fn optional_u64(params: &Params, keys: &[&str]) -> Option<u64> {
    lookup(params, keys).and_then(Value::as_u64)
}

fn missing(command: CommandName, key: &str) -> AgentError {
    AgentError::ExecutionFailed {
        command,
        source: BackendError::Operation(format!("Missing required parameter: {}", key)),
    }
}
