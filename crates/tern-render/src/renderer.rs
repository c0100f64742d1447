//! Inline component renderer.
//!
//! Splits final message text into an ordered list of markdown spans and
//! interactive components, preserving the original text order across both
//! marker kinds. Malformed marker payloads are logged and skipped; the
//! surrounding text still renders with no visual gap.

use crate::marker::{self, CommandBlockData, FileListData, MarkerKind};

/// A command component's render model.
///
/// Collapsed by default unless the command failed; the textual command is
/// exposed for copy-to-clipboard regardless of the collapse state.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandBlock {
    pub data: CommandBlockData,
    pub collapsed: bool,
}

impl CommandBlock {
    fn new(data: CommandBlockData) -> Self {
        let collapsed = !data.is_error();
        Self { data, collapsed }
    }

    pub fn is_error(&self) -> bool {
        self.data.is_error()
    }

    /// The command text for the copy-to-clipboard action.
    pub fn copy_text(&self) -> Option<&str> {
        self.data.command.as_deref()
    }

    pub fn toggle(&mut self) {
        self.collapsed = !self.collapsed;
    }
}

/// One block of the rendered message, in original text order.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedBlock {
    Markdown(String),
    FileList(FileListData),
    Command(CommandBlock),
}

/// Split message text into ordered render blocks.
///
/// Whitespace-only text between markers is dropped rather than rendered as
/// an empty markdown block.
pub fn render_blocks(text: &str) -> Vec<RenderedBlock> {
    let markers = marker::find_markers(text);
    let mut blocks: Vec<RenderedBlock> = Vec::new();
    let mut cursor = 0usize;

    for found in markers {
        push_markdown(&mut blocks, &text[cursor..found.start]);
        cursor = found.end;

        match found.kind {
            MarkerKind::FileList => match serde_json::from_str::<FileListData>(&found.payload) {
                Ok(data) => blocks.push(RenderedBlock::FileList(data)),
                Err(e) => {
                    tracing::warn!("Skipping malformed file-list marker payload: {}", e);
                }
            },
            MarkerKind::Command => match serde_json::from_str::<CommandBlockData>(&found.payload) {
                Ok(data) => blocks.push(RenderedBlock::Command(CommandBlock::new(data))),
                Err(e) => {
                    tracing::warn!("Skipping malformed command marker payload: {}", e);
                }
            },
        }
    }

    push_markdown(&mut blocks, &text[cursor..]);
    blocks
}

fn push_markdown(blocks: &mut Vec<RenderedBlock>, span: &str) {
    if !span.trim().is_empty() {
        blocks.push(RenderedBlock::Markdown(span.to_string()));
    }
}
