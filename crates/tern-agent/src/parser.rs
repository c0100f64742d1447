//! Command token extraction.
//!
//! Tokens are non-greedy bracket-delimited `[EXECUTE:{...}]` markers with a
//! JSON payload. The lexer reports explicit byte offsets so downstream
//! splicing is positional; two textually identical tokens each get their own
//! substitution instead of a search-and-replace hitting the first occurrence
//! twice.

use std::sync::OnceLock;

use regex::Regex;

use tern_core::CommandRequest;

/// One `[EXECUTE:{...}]` occurrence in response text.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandTokenMatch {
    /// Byte offset of `[` in the source text.
    pub start: usize,
    /// Byte offset one past `]`.
    pub end: usize,
    /// The full token text, kept verbatim for the malformed-payload case.
    pub raw: String,
    /// `None` when the payload failed to parse; the token then passes
    /// through to the output unchanged.
    pub request: Option<CommandRequest>,
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[EXECUTE:(\{.*?\})\]").expect("command token pattern"))
}

/// Extract all command tokens from response text, in textual order.
///
/// Payloads that are not valid JSON, or that lack the required `command`
/// key, are logged at warn level and yielded unparsed. They are neither
/// executed nor replaced.
pub fn extract_commands(text: &str) -> Vec<CommandTokenMatch> {
    let mut matches = Vec::new();

    for caps in token_re().captures_iter(text) {
        let (whole, payload) = match (caps.get(0), caps.get(1)) {
            (Some(w), Some(p)) => (w, p),
            _ => continue,
        };

        let request = match serde_json::from_str::<CommandRequest>(payload.as_str()) {
            Ok(request) => Some(request),
            Err(e) => {
                tracing::warn!("Skipping malformed command token: {}", e);
                None
            }
        };

        matches.push(CommandTokenMatch {
            start: whole.start(),
            end: whole.end(),
            raw: whole.as_str().to_string(),
            request,
        });
    }

    matches
}
