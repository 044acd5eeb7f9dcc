use serde_json::Value;

use super::{as_object, ValidationErrors, Validator};
use crate::database::models::{NewTask, TaskChanges, TaskPriority, TaskStatus};

pub const TITLE_REQUIRED: &str = "Title is required";
pub const TITLE_EMPTY: &str = "Title cannot be empty";
pub const DUE_DATE_INVALID: &str = "Valid due date is required";
pub const PRIORITY_INVALID: &str = "Invalid priority";
pub const STATUS_INVALID: &str = "Invalid status";
pub const DESCRIPTION_INVALID: &str = "Description must be text";

pub fn new_task(body: &Value) -> Result<NewTask, ValidationErrors> {
    let body = as_object(body)?;
    let mut v = Validator::new(body);

    let title = v.required_text("title", TITLE_REQUIRED);
    let description = v.nullable_text("description", DESCRIPTION_INVALID).flatten();
    let due_date = v.required_date("dueDate", DUE_DATE_INVALID);
    let priority = v.required_one_of::<TaskPriority>("priority", PRIORITY_INVALID);
    let status = v.required_one_of::<TaskStatus>("status", STATUS_INVALID);

    match (title, due_date, priority, status) {
        (Some(title), Some(due_date), Some(priority), Some(status)) if v.is_clean() => Ok(NewTask {
            title,
            description,
            status,
            priority,
            due_date,
        }),
        _ => Err(v.into_errors()),
    }
}

/// Unknown keys, and attempts to rewrite `user`, `_id` or `createdAt`, are ignored.
pub fn task_changes(body: &Value) -> Result<TaskChanges, ValidationErrors> {
    let body = as_object(body)?;
    let mut v = Validator::new(body);

    let changes = TaskChanges {
        title: v.optional_text("title", TITLE_EMPTY),
        description: v.nullable_text("description", DESCRIPTION_INVALID),
        due_date: v.optional_date("dueDate", DUE_DATE_INVALID),
        priority: v.optional_one_of::<TaskPriority>("priority", PRIORITY_INVALID),
        status: v.optional_one_of::<TaskStatus>("status", STATUS_INVALID),
    };

    if v.is_clean() {
        Ok(changes)
    } else {
        Err(v.into_errors())
    }
}
