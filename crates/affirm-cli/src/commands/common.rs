use std::env;
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;
use std::process::Command;

use affirm_core::services::AffirmationService;
use affirm_core::util::unix_millis_now;
use affirm_core::widget::{JsonFileStore, WidgetBridge};
use affirm_core::Affirmation;
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct AffirmationListItem {
    pub id: String,
    pub text: String,
    pub preview: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub relative_time: String,
}

pub fn open_service(db_path: &Path) -> Result<AffirmationService, CliError> {
    Ok(AffirmationService::open_path(db_path)?)
}

pub fn open_widget_bridge(widget_path: &Path) -> Result<WidgetBridge<JsonFileStore>, CliError> {
    Ok(WidgetBridge::new(JsonFileStore::open(widget_path)?))
}

pub fn format_affirmation_lines(affirmations: &[Affirmation]) -> Vec<String> {
    let now_ms = unix_millis_now();
    affirmations
        .iter()
        .map(|affirmation| {
            let id = affirmation.id.to_string();
            let short_id = id.chars().take(13).collect::<String>();
            let preview = affirmation.preview(50);
            let relative_time = format_relative_time(affirmation.updated_at, now_ms);

            if affirmation.is_active {
                format!("{short_id:<13}  {preview:<50}  {relative_time}")
            } else {
                format!("{short_id:<13}  {preview:<50}  {relative_time:<10}  (paused)")
            }
        })
        .collect()
}

pub fn affirmation_to_list_item(affirmation: &Affirmation) -> AffirmationListItem {
    let now_ms = unix_millis_now();

    AffirmationListItem {
        id: affirmation.id.to_string(),
        text: affirmation.text.clone(),
        preview: affirmation.preview(80),
        is_active: affirmation.is_active,
        created_at: affirmation.created_at,
        updated_at: affirmation.updated_at,
        relative_time: format_relative_time(affirmation.updated_at, now_ms),
    }
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn resolve_affirmation_text(text_parts: &[String]) -> Result<String, CliError> {
    if let Some(text) = normalize_text(&text_parts.join(" ")) {
        return Ok(text);
    }

    if let Some(text) = read_piped_stdin()? {
        return Ok(text);
    }

    if let Some(text) = capture_editor_input()? {
        return Ok(text);
    }

    Err(CliError::EmptyText)
}

pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_text(&buffer))
}

pub fn capture_editor_input() -> Result<Option<String>, CliError> {
    capture_editor_input_with_initial("")
}

pub fn capture_editor_input_with_initial(initial_text: &str) -> Result<Option<String>, CliError> {
    edit_text_with(&preferred_editor(), initial_text)
}

/// Open `initial_text` in `editor` and return what was saved.
///
/// The scratch file is removed on every path, including editor failure.
pub fn edit_text_with(editor: &str, initial_text: &str) -> Result<Option<String>, CliError> {
    let mut scratch = tempfile::Builder::new()
        .prefix("affirm-")
        .suffix(".txt")
        .tempfile()?;
    scratch.write_all(initial_text.as_bytes())?;
    scratch.flush()?;

    // Release our handle so editors that replace the file are not blocked
    let scratch_path = scratch.into_temp_path();
    launch_editor(editor, &scratch_path)?;
    let text = std::fs::read_to_string(&scratch_path)?;
    scratch_path.close()?;

    Ok(normalize_text(&text))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}
