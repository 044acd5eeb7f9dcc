pub mod filter_order;

pub use filter_order::TaskSort;

use crate::database::models::Task;

/// Sentinel meaning "do not filter on this field"
pub const ALL: &str = "all";

/// Raw query string of `GET /api/tasks`. `status` and `priority` may repeat
/// (`?status=To-Do&status=Completed`); `sort` keeps its last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub status: Vec<String>,
    pub priority: Vec<String>,
    pub sort: Option<String>,
}

impl TaskQuery {
    /// Unknown keys are ignored
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        pairs.into_iter().fold(TaskQuery::default(), |mut query, (key, value)| {
            match key.as_str() {
                "status" => query.status.push(value),
                "priority" => query.priority.push(value),
                "sort" => query.sort = Some(value),
                _ => {}
            }
            query
        })
    }
}

/// Filters are kept as literal strings: a value outside the enum is not an
/// error, it simply matches nothing. An empty list means no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Vec<String>,
    pub priority: Vec<String>,
    pub sort: TaskSort,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        any_of(&self.status, task.status.as_str()) && any_of(&self.priority, task.priority.as_str())
    }
}

impl From<TaskQuery> for TaskFilter {
    fn from(query: TaskQuery) -> Self {
        Self {
            status: literals(query.status),
            priority: literals(query.priority),
            sort: TaskSort::parse(query.sort.as_deref()),
        }
    }
}

fn any_of(accepted: &[String], value: &str) -> bool {
    accepted.is_empty() || accepted.iter().any(|candidate| candidate == value)
}

/// `all` anywhere in the list lifts the filter; blanks are dropped
fn literals(values: Vec<String>) -> Vec<String> {
    if values.iter().any(|v| v == ALL) {
        return Vec::new();
    }
    values.into_iter().filter(|v| !v.is_empty()).collect()
}
