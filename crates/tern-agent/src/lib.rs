//! Command grammar parsing and dispatch.
//!
//! The agent half of the protocol core: extract `[EXECUTE:{...}]` tokens
//! from LLM response text, dispatch each recognized command to the external
//! backend (creating an agent session on demand for session-scoped
//! commands), and splice formatted results back into the response by
//! position.

mod dispatch;
mod error;
mod parser;
mod response;
mod session;

pub use dispatch::CommandDispatcher;
pub use error::AgentError;
pub use parser::{extract_commands, CommandTokenMatch};
pub use response::process_response;
pub use session::{ActionRecord, SessionHandle};

#[cfg(test)]
pub(crate) mod test_support;
