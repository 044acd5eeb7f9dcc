use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "To-Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To-Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "status", value: s.to_string() })
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "priority", value: s.to_string() })
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task document as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(serialize_with = "super::timestamp::serialize")]
    pub due_date: DateTime<Utc>,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(serialize_with = "super::timestamp::serialize")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Past due and not yet completed
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now && self.status != TaskStatus::Completed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: DateTime<Utc>,
}

/// Partial update. `description: Some(None)` clears the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        *self == TaskChanges::default()
    }

    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

/// Dashboard summary over one user's tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub overdue: usize,
}

impl TaskStats {
    pub fn collect(tasks: &[Task], now: DateTime<Utc>) -> Self {
        tasks.iter().fold(TaskStats::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::ToDo => {}
            }
            if task.is_overdue(now) {
                stats.overdue += 1;
            }
            stats
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn sample(status: TaskStatus, due_date: DateTime<Utc>) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Buy milk".to_string(),
            description: None,
            status,
            priority: TaskPriority::Low,
            due_date,
            user_id: Uuid::new_v4(),
            created_at: Utc.with_ymd_and_hms(2023, 12, 1, 8, 30, 0).unwrap(),
        }
    }

    #[test]
    fn status_parses_wire_names_only() {
        assert_eq!("In Progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("To-Do".parse::<TaskStatus>(), Ok(TaskStatus::ToDo));
        assert!("InProgress".parse::<TaskStatus>().is_err());
        assert!("completed".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn priority_rejects_unknown_values() {
        let err = "Urgent".parse::<TaskPriority>().unwrap_err();
        assert_eq!(err.kind, "priority");
        assert_eq!(err.to_string(), "unknown priority value: Urgent");
    }

    #[test]
    fn serializes_document_field_names() {
        let due = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let task = sample(TaskStatus::ToDo, due);
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["_id"], json!(task.id.to_string()));
        assert_eq!(value["user"], json!(task.user_id.to_string()));
        assert_eq!(value["status"], "To-Do");
        assert_eq!(value["dueDate"], "2024-01-01T00:00:00.000Z");
        assert_eq!(value["createdAt"], "2023-12-01T08:30:00.000Z");
        assert!(value.get("description").is_none());
        assert!(value.get("id").is_none());
    }

    #[test]
    fn overdue_ignores_completed_tasks() {
        let now = Utc::now();
        let yesterday = now - Duration::days(1);

        assert!(sample(TaskStatus::ToDo, yesterday).is_overdue(now));
        assert!(sample(TaskStatus::InProgress, yesterday).is_overdue(now));
        assert!(!sample(TaskStatus::Completed, yesterday).is_overdue(now));
        assert!(!sample(TaskStatus::ToDo, now + Duration::days(1)).is_overdue(now));
    }

    #[test]
    fn changes_merge_only_present_fields() {
        let mut task = sample(TaskStatus::ToDo, Utc::now());
        task.description = Some("two litres".to_string());

        TaskChanges {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        }
        .apply(&mut task);
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description.as_deref(), Some("two litres"));

        TaskChanges {
            description: Some(None),
            ..Default::default()
        }
        .apply(&mut task);
        assert_eq!(task.description, None);
    }

    #[test]
    fn stats_count_by_status_and_overdue() {
        let now = Utc::now();
        let past = now - Duration::days(2);
        let future = now + Duration::days(2);
        let tasks = vec![
            sample(TaskStatus::ToDo, past),
            sample(TaskStatus::InProgress, future),
            sample(TaskStatus::InProgress, past),
            sample(TaskStatus::Completed, past),
        ];

        let stats = TaskStats::collect(&tasks, now);
        assert_eq!(
            stats,
            TaskStats { total: 4, in_progress: 2, completed: 1, overdue: 2 }
        );
        let value = serde_json::to_value(stats).unwrap();
        assert_eq!(value["inProgress"], 2);
    }
}
