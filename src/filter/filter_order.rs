use std::cmp::Ordering;

use crate::database::models::Task;

/// Resolved `sort` query parameter for the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskSort {
    /// Newest first
    #[default]
    CreatedAtDesc,
    DueDateAsc,
    DueDateDesc,
}

impl TaskSort {
    /// Unknown or missing values fall back to the default order.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("dueDate") => TaskSort::DueDateAsc,
            Some("-dueDate") => TaskSort::DueDateDesc,
            _ => TaskSort::CreatedAtDesc,
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            TaskSort::CreatedAtDesc => "ORDER BY created_at DESC",
            TaskSort::DueDateAsc => "ORDER BY due_date ASC",
            TaskSort::DueDateDesc => "ORDER BY due_date DESC",
        }
    }

    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            TaskSort::CreatedAtDesc => b.created_at.cmp(&a.created_at),
            TaskSort::DueDateAsc => a.due_date.cmp(&b.due_date),
            TaskSort::DueDateDesc => b.due_date.cmp(&a.due_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_sort_keys() {
        assert_eq!(TaskSort::parse(Some("dueDate")), TaskSort::DueDateAsc);
        assert_eq!(TaskSort::parse(Some("-dueDate")), TaskSort::DueDateDesc);
        assert_eq!(TaskSort::parse(Some("createdAt")), TaskSort::CreatedAtDesc);
    }

    #[test]
    fn unknown_sort_falls_back_to_newest_first() {
        assert_eq!(TaskSort::parse(None), TaskSort::CreatedAtDesc);
        assert_eq!(TaskSort::parse(Some("priority")), TaskSort::CreatedAtDesc);
        assert_eq!(TaskSort::parse(Some("")), TaskSort::CreatedAtDesc);
    }

    #[test]
    fn generates_order_by_clause() {
        assert_eq!(TaskSort::DueDateAsc.to_sql(), "ORDER BY due_date ASC");
        assert_eq!(TaskSort::default().to_sql(), "ORDER BY created_at DESC");
    }
}
