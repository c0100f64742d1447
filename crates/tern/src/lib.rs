//! Agent command protocol core for the Tern desktop chat client.
//!
//! This crate wires the protocol pieces together for the UI shell:
//! - [`AgentMode`]: parse, dispatch, and format the command tokens embedded
//!   in one LLM response, and hold the permission gate;
//! - [`ChatSubscription`]: scoped delivery of backend events into one
//!   chat's state, torn down when the active chat changes.
//!
//! The UI layer renders [`tern_render::RenderedBlock`]s and drives the gate
//! from its approval dialog; everything else stays behind this facade.

mod agent_mode;
mod subscription;

pub use agent_mode::AgentMode;
pub use subscription::{ChatState, ChatSubscription};

// The surface the UI shell needs, re-exported from the layer crates.
pub use tern_agent::{ActionRecord, AgentError, CommandDispatcher};
pub use tern_core::{
    AgentBackend, BackendError, ChatEvent, CommandName, CommandRequest, CommandResult,
    MessageRecord, MessageRole, PermissionLevel, PermissionRequest, StreamingMessage,
};
pub use tern_hitl::{GateError, PermissionGate};
pub use tern_render::{render_blocks, CommandBlock, RenderedBlock};
pub use tern_settings::{LogLevel, TernSettings};

/// Initialise tracing once for the client process.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies.
pub fn init_tracing(level: LogLevel) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
