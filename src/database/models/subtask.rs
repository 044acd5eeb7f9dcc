use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const TITLE_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "task")]
    pub task_id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(serialize_with = "super::timestamp::serialize")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSubtask {
    pub title: String,
    pub task_id: Uuid,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtaskChanges {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl SubtaskChanges {
    pub fn apply(self, subtask: &mut Subtask) {
        if let Some(title) = self.title {
            subtask.title = title;
        }
        if let Some(completed) = self.completed {
            subtask.completed = completed;
        }
    }
}
