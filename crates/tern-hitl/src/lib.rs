//! Human-in-the-loop permission gate.
//!
//! The backend pushes a permission request before running anything risky;
//! this module queues those requests, surfaces exactly one at a time, and
//! reports the user's decision back over the request's callback id.

mod gate;

pub use gate::{GateError, PermissionGate};
