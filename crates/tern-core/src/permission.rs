//! Permission request types for gated backend operations.
//!
//! The backend classifies operations and pushes a [`PermissionRequest`] to
//! the client before running anything risky; the client answers through
//! `handle_permission_response` correlated by `callback_id`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Risk classification of an operation, supplied by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PermissionLevel {
    /// No confirmation needed
    Safe,
    /// Requires confirmation
    Moderate,
    /// Requires confirmation with an explicit warning
    Dangerous,
}

impl PermissionLevel {
    /// Whether the approval dialog must surface a warning banner.
    pub fn requires_warning(&self) -> bool {
        matches!(self, Self::Dangerous)
    }
}

/// A pending approval pushed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PermissionRequest {
    /// Human-readable operation title, e.g. "Execute Terminal Command"
    pub operation: String,
    /// One-line description of what will happen
    pub description: String,
    pub level: PermissionLevel,
    /// Operation-specific key/value detail rows for the dialog
    #[serde(default)]
    pub details: HashMap<String, String>,
    /// Correlation id for the response; absent means the backend does not
    /// wait for an answer and dismissal stays local.
    #[serde(default)]
    pub callback_id: Option<String>,
}
