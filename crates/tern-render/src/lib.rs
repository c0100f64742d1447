//! Result formatting and inline component rendering.
//!
//! Two halves of the same wire format:
//! - [`format`] turns typed command results into markdown text with embedded
//!   component markers;
//! - [`renderer`] re-parses final message text and splits it into an ordered
//!   list of markdown spans and interactive components.
//!
//! The marker codec lives in [`marker`] so both halves agree on escaping.

pub mod format;
pub mod marker;
pub mod renderer;

pub use format::{error_marker, format_result, FormatOptions};
pub use marker::{CommandBlockData, FileListData, MarkerKind, MarkerMatch};
pub use renderer::{render_blocks, CommandBlock, RenderedBlock};
