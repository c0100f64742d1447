//! Response processing: splice command results into LLM text.
//!
//! Commands embedded in one response run strictly in textual order,
//! sequentially; a later command's dispatch does not begin until the
//! former's formatting completed. Splicing is positional, so duplicate
//! identical tokens each receive their own substitution.

use tern_render::{error_marker, format_result, FormatOptions};

use crate::dispatch::CommandDispatcher;
use crate::parser::extract_commands;

/// Process one complete LLM response: extract command tokens, dispatch each
/// recognized command, and return the text with results spliced in.
///
/// Failure containment is per command occurrence: an unknown command, a
/// user rejection, or a backend failure becomes an inline error marker and
/// the remaining commands still run. Malformed tokens pass through verbatim.
pub async fn process_response(
    dispatcher: &CommandDispatcher,
    options: &FormatOptions,
    text: &str,
) -> String {
    let matches = extract_commands(text);
    if matches.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;

    for found in matches {
        out.push_str(&text[cursor..found.start]);
        cursor = found.end;

        match &found.request {
            None => out.push_str(&found.raw),
            Some(request) => match dispatcher.dispatch(request).await {
                Ok(result) => out.push_str(&format_result(&result, options)),
                Err(e) => {
                    tracing::debug!("Command {} failed: {}", request.command, e);
                    out.push_str(&error_marker(&request.command, &e.to_string()));
                }
            },
        }
    }

    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockBackend;
    use std::sync::Arc;
    use tern_render::{render_blocks, RenderedBlock};

    fn options() -> FormatOptions {
        FormatOptions::default()
    }

    #[tokio::test]
    async fn test_text_without_commands_passes_through() {
        let dispatcher = CommandDispatcher::new(Arc::new(MockBackend::new()));
        let text = "Nothing to run here.";
        assert_eq!(process_response(&dispatcher, &options(), text).await, text);
    }

    #[tokio::test]
    async fn test_read_directory_scenario() {
        let backend = Arc::new(MockBackend::new().with_directory(&["a.txt"], &[]));
        let dispatcher = CommandDispatcher::new(backend);

        let text = r#"List files. [EXECUTE:{"command":"read_directory","params":{"directoryPath":"/tmp"}}]"#;
        let processed = process_response(&dispatcher, &options(), text).await;

        assert!(processed.starts_with("List files. "));
        assert!(processed.contains("1 files"));
        assert!(processed.contains("0 directories"));

        let blocks = render_blocks(&processed);
        let file_list = blocks
            .iter()
            .find_map(|b| match b {
                RenderedBlock::FileList(data) => Some(data),
                _ => None,
            })
            .expect("file-list component rendered");
        assert_eq!(file_list.files.len(), 1);
        assert_eq!(file_list.files[0].name, "a.txt");
        assert!(file_list.directories.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_token_survives_verbatim() {
        let dispatcher = CommandDispatcher::new(Arc::new(MockBackend::new()));

        let text = r#"before [EXECUTE:{"command": nope}] after"#;
        let processed = process_response(&dispatcher, &options(), text).await;
        assert_eq!(processed, text);
    }

    #[tokio::test]
    async fn test_duplicate_tokens_each_substituted() {
        let backend = Arc::new(MockBackend::new());
        let dispatcher = CommandDispatcher::new(backend.clone());

        let token = r#"[EXECUTE:{"command":"execute_command","params":{"command":"date"}}]"#;
        let text = format!("first {} second {}", token, token);
        let processed = process_response(&dispatcher, &options(), &text).await;

        assert_eq!(backend.action_calls().len(), 2, "one dispatch per token");
        assert!(!processed.contains("[EXECUTE:"), "both tokens replaced");
        assert_eq!(processed.matches("<command data='").count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_command_becomes_error_marker() {
        let dispatcher = CommandDispatcher::new(Arc::new(MockBackend::new()));

        let text = r#"[EXECUTE:{"command":"frobnicate"}]"#;
        let processed = process_response(&dispatcher, &options(), text).await;

        let blocks = render_blocks(&processed);
        match &blocks[0] {
            RenderedBlock::Command(block) => {
                assert!(block.is_error());
                assert!(!block.collapsed);
                assert!(block.data.error.as_deref().unwrap().contains("frobnicate"));
            }
            other => panic!("unexpected block: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_siblings() {
        let backend = Arc::new(MockBackend::new().failing_actions("disk on fire"));
        let dispatcher = CommandDispatcher::new(backend.clone());

        // First command fails (session action), second is stateless and fine.
        let text = concat!(
            r#"[EXECUTE:{"command":"execute_command","params":{"command":"ls"}}]"#,
            " and ",
            r#"[EXECUTE:{"command":"get_current_directory"}]"#,
        );
        let processed = process_response(&dispatcher, &options(), text).await;

        let blocks = render_blocks(&processed);
        let commands: Vec<_> = blocks
            .iter()
            .filter_map(|b| match b {
                RenderedBlock::Command(c) => Some(c),
                _ => None,
            })
            .collect();
        assert_eq!(commands.len(), 2);
        assert!(commands[0].is_error());
        assert!(!commands[1].is_error());
        assert_eq!(commands[1].data.result.as_deref(), Some("/home/user"));
    }

    #[tokio::test]
    async fn test_commands_processed_in_textual_order() {
        let backend = Arc::new(MockBackend::new());
        let dispatcher = CommandDispatcher::new(backend.clone());

        let text = concat!(
            r#"[EXECUTE:{"command":"change_directory","params":{"path":"/a"}}]"#,
            r#"[EXECUTE:{"command":"kill_process","params":{"pid":7}}]"#,
        );
        process_response(&dispatcher, &options(), text).await;

        let actions = backend.action_calls();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].1, "change_directory");
        assert_eq!(actions[1].1, "kill_process");
    }
}
