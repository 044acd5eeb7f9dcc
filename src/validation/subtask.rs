use serde_json::Value;

use super::{as_object, ValidationErrors, Validator};
use crate::database::models::subtask::TITLE_MAX_CHARS;
use crate::database::models::SubtaskChanges;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const TITLE_EMPTY: &str = "Title cannot be empty";
pub const TITLE_TOO_LONG: &str = "Title cannot be more than 100 characters";
pub const TASK_REQUIRED: &str = "Task ID is required";
pub const COMPLETED_INVALID: &str = "Completed must be boolean";

/// Validated create payload. The task reference stays raw: an id that does
/// not parse is reported as a missing task, not a validation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtaskDraft {
    pub title: String,
    pub task: String,
}

pub fn new_subtask(body: &Value) -> Result<SubtaskDraft, ValidationErrors> {
    let body = as_object(body)?;
    let mut v = Validator::new(body);

    let title = v.required_text("title", TITLE_REQUIRED);
    let title = v.max_chars("title", title, TITLE_MAX_CHARS, TITLE_TOO_LONG);
    let task = v.required_text("task", TASK_REQUIRED);

    match (title, task) {
        (Some(title), Some(task)) if v.is_clean() => Ok(SubtaskDraft { title, task }),
        _ => Err(v.into_errors()),
    }
}

pub fn subtask_changes(body: &Value) -> Result<SubtaskChanges, ValidationErrors> {
    let body = as_object(body)?;
    let mut v = Validator::new(body);

    let title = v.optional_text("title", TITLE_EMPTY);
    let changes = SubtaskChanges {
        title: v.max_chars("title", title, TITLE_MAX_CHARS, TITLE_TOO_LONG),
        completed: v.optional_bool("completed", COMPLETED_INVALID),
    };

    if v.is_clean() {
        Ok(changes)
    } else {
        Err(v.into_errors())
    }
}
