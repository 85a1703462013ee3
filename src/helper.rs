use std::{path::Path, process::Command};

use chrono::{DateTime, Utc};
use log::debug;
use shell_words::split;

use crate::{NewsError, Result};

/// Length of the content preview shown in listings
pub const SNIPPET_LEN: usize = 100;

/// First `max_chars` characters of `content`, with `...` appended when cut.
pub fn content_snippet(content: &str, max_chars: usize) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Long-form date used in article bylines, e.g. "October 26, 2023"
pub fn format_display_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Removes the HTML comment lines of the editor template
pub fn strip_editor_comments(content: &str) -> String {
    let mut in_comment = false;
    let mut kept = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if in_comment {
            in_comment = !trimmed.ends_with("-->");
            continue;
        }
        if trimmed.starts_with("<!--") {
            in_comment = !trimmed.ends_with("-->");
            continue;
        }
        kept.push(line);
    }

    kept.join("\n").trim().to_string()
}

/// Runs `editor_cmd` on `file_path` and waits for it to exit
pub fn launch_editor(editor_cmd: &str, file_path: &Path) -> Result<()> {
    let args = split(editor_cmd).map_err(|e| NewsError::EditorError {
        message: format!("Failed to parse editor command: {}", e),
    })?;

    let Some((program, rest)) = args.split_first() else {
        return Err(NewsError::EditorError {
            message: "Empty editor command".to_string(),
        });
    };

    debug!("Launching editor: {} {}", editor_cmd, file_path.display());
    let status = Command::new(program).args(rest).arg(file_path).status()?;

    if !status.success() {
        return Err(NewsError::EditorError {
            message: "Editor exited with non-zero status".to_string(),
        });
    }

    Ok(())
}
