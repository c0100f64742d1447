//! Core types and traits for the Tern agent command protocol.
//!
//! This crate provides the foundation types used across all other tern crates.
//! It has ZERO internal crate dependencies and only depends on external libraries.
//!
//! ## Architecture Principle
//!
//! tern-core sits at the bottom of the dependency hierarchy:
//! - Layer 1 (Foundation): tern-core ← YOU ARE HERE
//! - Layer 2 (Infrastructure): tern-settings
//! - Layer 3 (Domain): tern-agent, tern-render, tern-hitl
//! - Layer 4 (Application): tern (facade crate)

pub mod backend;
pub mod command;
pub mod events;
pub mod message;
pub mod permission;
pub mod result;

// Re-exports
pub use backend::{ActionOutcome, AgentBackend, BackendError, SearchQuery};
pub use command::{CommandName, CommandRequest};
pub use events::ChatEvent;
pub use message::{MessageRecord, MessageRole, StreamingMessage};
pub use permission::{PermissionLevel, PermissionRequest};
pub use result::{
    AppInfo, CommandOutput, CommandResult, DirectoryContents, FileEntry, ProcessInfo, SearchHit,
};
