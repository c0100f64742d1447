//! Result formatter: typed command results to markdown + component markers.
//!
//! Formatting is a pure function of the result value and the options, so the
//! same result always produces the same fragment. Failures never originate
//! here; dispatch errors arrive already classified and become error-flavored
//! `command` markers via [`error_marker`].

use tern_core::{AppInfo, CommandOutput, CommandResult, ProcessInfo, SearchHit};

use crate::marker::{self, CommandBlockData, FileListData, MarkerKind};

/// Display knobs for formatted fragments.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Maximum process table rows before the "+N more" footer.
    pub process_rows: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { process_rows: 20 }
    }
}

/// Format one command result into the fragment spliced into the response.
pub fn format_result(result: &CommandResult, options: &FormatOptions) -> String {
    match result {
        CommandResult::Directory {
            base_path,
            contents,
        } => {
            let data = FileListData {
                directories: contents.directories.clone(),
                files: contents.files.clone(),
                base_path: base_path.clone(),
            };
            format!(
                "Listed `{}`: {} directories, {} files\n\n{}",
                base_path,
                data.directories.len(),
                data.files.len(),
                marker::encode(MarkerKind::FileList, &data),
            )
        }
        CommandResult::FileContents { path, content } => {
            let fence = fence_for(content);
            format!("Contents of `{}`:\n\n{}\n{}\n{}", path, fence, content, fence)
        }
        CommandResult::SearchHits { pattern, hits } => format_search_hits(pattern, hits),
        CommandResult::Command {
            command,
            working_directory,
            output,
        } => command_output_marker(command, working_directory.as_deref(), output),
        CommandResult::Processes(processes) => format_processes(processes, options.process_rows),
        CommandResult::Applications(apps) => format_applications(apps),
        CommandResult::Message { command, text } => generic_marker(command.as_str(), text),
        CommandResult::Raw { command, value } => {
            let text = match value.as_str() {
                Some(s) => s.to_string(),
                None => value.to_string(),
            };
            generic_marker(command.as_str(), &text)
        }
    }
}

/// Build an error-flavored `command` marker for a failed command.
pub fn error_marker(command: &str, message: &str) -> String {
    let data = CommandBlockData {
        command: Some(command.to_string()),
        status: CommandBlockData::STATUS_ERROR.to_string(),
        stdout: None,
        stderr: None,
        exit_code: None,
        working_directory: None,
        result: None,
        error: Some(message.to_string()),
    };
    marker::encode(MarkerKind::Command, &data)
}

/// A fence one backtick longer than the longest run in the content, so file
/// contents containing ``` cannot break out of the block.
fn fence_for(content: &str) -> String {
    let mut longest = 0usize;
    let mut run = 0usize;
    for c in content.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

fn format_search_hits(pattern: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("No matches found for `{}`.", pattern);
    }

    let mut out = format!("Found {} matches for `{}`:\n", hits.len(), pattern);
    for hit in hits {
        let file_name = file_name_of(&hit.file_path);
        out.push_str(&format!(
            "\n**{}** (line {})\n```\n{}\n```\n",
            file_name,
            hit.line_number,
            hit.line_content.trim(),
        ));
    }
    out
}

/// Substring after the last path separator, handling both `/` and `\`.
fn file_name_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn command_output_marker(
    command: &str,
    working_directory: Option<&str>,
    output: &CommandOutput,
) -> String {
    let data = CommandBlockData {
        command: Some(command.to_string()),
        status: CommandBlockData::STATUS_SUCCESS.to_string(),
        stdout: Some(output.stdout.clone()),
        stderr: Some(output.stderr.clone()),
        exit_code: Some(output.exit_code),
        working_directory: working_directory.map(str::to_string),
        result: None,
        error: None,
    };
    marker::encode(MarkerKind::Command, &data)
}

fn generic_marker(command: &str, result: &str) -> String {
    let data = CommandBlockData {
        command: Some(command.to_string()),
        status: CommandBlockData::STATUS_SUCCESS.to_string(),
        stdout: None,
        stderr: None,
        exit_code: None,
        working_directory: None,
        result: Some(result.to_string()),
        error: None,
    };
    marker::encode(MarkerKind::Command, &data)
}

fn format_processes(processes: &[ProcessInfo], cap: usize) -> String {
    if processes.is_empty() {
        return "No running processes reported.".to_string();
    }

    let mut out = String::from("| PID | Name | Memory (MB) | CPU % |\n|---|---|---|---|\n");
    for process in processes.iter().take(cap) {
        let memory = process
            .memory_usage
            .map(|kb| format!("{:.1}", kb as f64 / 1024.0))
            .unwrap_or_else(|| "-".to_string());
        let cpu = process
            .cpu_usage
            .map(|c| format!("{:.1}", c))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            process.pid, process.name, memory, cpu,
        ));
    }

    if processes.len() > cap {
        out.push_str(&format!("\n_+{} more_\n", processes.len() - cap));
    }
    out
}

fn format_applications(apps: &[AppInfo]) -> String {
    if apps.is_empty() {
        return "No installed applications found.".to_string();
    }

    let mut sorted: Vec<&AppInfo> = apps.iter().collect();
    sorted.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    let mut out = format!("Found {} installed applications:\n", apps.len());
    let mut current_group: Option<char> = None;

    for app in sorted {
        let group = app
            .name
            .chars()
            .next()
            .map(|c| {
                if c.is_ascii_alphabetic() {
                    c.to_ascii_uppercase()
                } else {
                    '#'
                }
            })
            .unwrap_or('#');

        if current_group != Some(group) {
            current_group = Some(group);
            out.push_str(&format!("\n### {}\n", group));
        }
        out.push_str(&format!("- {}\n", app.name));
    }
    out
}
