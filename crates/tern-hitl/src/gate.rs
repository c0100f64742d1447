//! Permission gate state machine.
//!
//! Per pending request: `Queued -> Showing -> Resolved`. Exactly one request
//! is showing at a time; arrivals while one is showing append to the tail of
//! a FIFO queue and never pre-empt the displayed request. Resolution answers
//! the backend over `callback_id` (when present) and promotes the next
//! queued request automatically.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use tern_core::{AgentBackend, BackendError, PermissionRequest};

/// Errors from resolving a permission request.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// `resolve` was called while nothing was showing.
    #[error("no permission request is currently showing")]
    NothingShowing,

    /// The backend rejected the response delivery.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Default)]
struct GateState {
    showing: Option<PermissionRequest>,
    queue: VecDeque<PermissionRequest>,
}

/// Queue of pending approvals with a single visible slot.
///
/// The currently showing request is observable through a `watch` channel so
/// the dialog layer can subscribe instead of polling.
pub struct PermissionGate {
    backend: Arc<dyn AgentBackend>,
    state: Mutex<GateState>,
    shown: watch::Sender<Option<PermissionRequest>>,
}

impl PermissionGate {
    pub fn new(backend: Arc<dyn AgentBackend>) -> Self {
        let (shown, _) = watch::channel(None);
        Self {
            backend,
            state: Mutex::new(GateState::default()),
            shown,
        }
    }

    /// Observe the currently showing request (`None` when the queue is dry).
    pub fn subscribe(&self) -> watch::Receiver<Option<PermissionRequest>> {
        self.shown.subscribe()
    }

    /// Accept an incoming request: show it immediately if nothing is
    /// showing, otherwise append it to the queue tail.
    pub async fn push(&self, request: PermissionRequest) {
        let mut state = self.state.lock().await;
        if state.showing.is_none() {
            state.showing = Some(request.clone());
            let _ = self.shown.send(Some(request));
        } else {
            state.queue.push_back(request);
        }
    }

    /// Resolve the showing request with the user's decision.
    ///
    /// Sends `{callback_id, approved}` back to the backend when the request
    /// carries a callback id; without one the dismissal stays local. The
    /// next queued request (if any) starts showing before this returns.
    pub async fn resolve(&self, approved: bool) -> Result<PermissionRequest, GateError> {
        let mut state = self.state.lock().await;
        let resolved = state.showing.take().ok_or(GateError::NothingShowing)?;

        // Promote the next request before the backend round-trip so the
        // queue keeps draining even if delivery fails.
        let next = state.queue.pop_front();
        if let Some(ref request) = next {
            state.showing = Some(request.clone());
        }
        let _ = self.shown.send(next);
        drop(state);

        if let Some(callback_id) = &resolved.callback_id {
            self.backend
                .handle_permission_response(callback_id, approved)
                .await?;
        } else {
            tracing::debug!(
                "Dismissed permission request '{}' locally (no callback id)",
                resolved.operation
            );
        }

        Ok(resolved)
    }

    /// The request currently showing, if any.
    pub async fn current(&self) -> Option<PermissionRequest> {
        let state = self.state.lock().await;
        state.showing.clone()
    }

    /// Number of requests waiting behind the showing one.
    pub async fn queued(&self) -> usize {
        let state = self.state.lock().await;
        state.queue.len()
    }
}
