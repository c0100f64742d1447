//! Agent dispatch error taxonomy.

use tern_core::{BackendError, CommandName};

/// Failure of a single dispatched command.
///
/// Containment is per-command: one failing command is formatted as an inline
/// error component and never aborts its siblings in the same response.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The token named a command outside the recognized set.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// The backend refused the operation because the user rejected it.
    #[error("Operation rejected: {reason}")]
    PermissionDenied {
        command: CommandName,
        reason: String,
    },

    /// Any other backend failure.
    #[error("Command {command} failed: {source}")]
    ExecutionFailed {
        command: CommandName,
        #[source]
        source: BackendError,
    },
}

impl AgentError {
    /// Classify a backend error: anything whose message mentions permission
    /// or denial is a user rejection, everything else a generic failure.
    pub(crate) fn classify(command: CommandName, source: BackendError) -> Self {
        let message = source.to_string();
        let lowered = message.to_lowercase();
        if lowered.contains("permission") || lowered.contains("denied") {
            Self::PermissionDenied {
                command,
                reason: message,
            }
        } else {
            Self::ExecutionFailed { command, source }
        }
    }
}
