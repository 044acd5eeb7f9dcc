use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    NewSubtask, NewTask, NewUser, Subtask, SubtaskChanges, Task, TaskChanges, User,
};
use crate::filter::TaskFilter;

/// Document operations the HTTP handlers rely on. Ownership is not checked
/// here; callers resolve the document and authorize before mutating.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;

    /// Fails with `DatabaseError::Conflict` when the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn list_tasks(&self, owner: Uuid, filter: &TaskFilter) -> Result<Vec<Task>, DatabaseError>;
    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, DatabaseError>;
    async fn insert_task(&self, owner: Uuid, task: NewTask) -> Result<Task, DatabaseError>;
    /// `None` when the task vanished before the write landed.
    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Option<Task>, DatabaseError>;
    /// Removes the task and its subtasks.
    async fn delete_task(&self, id: Uuid) -> Result<bool, DatabaseError>;

    /// Oldest first
    async fn list_subtasks(&self, task_id: Uuid) -> Result<Vec<Subtask>, DatabaseError>;
    async fn find_subtask(&self, id: Uuid) -> Result<Option<Subtask>, DatabaseError>;
    async fn insert_subtask(&self, owner: Uuid, subtask: NewSubtask) -> Result<Subtask, DatabaseError>;
    async fn update_subtask(&self, id: Uuid, changes: SubtaskChanges) -> Result<Option<Subtask>, DatabaseError>;
    async fn delete_subtask(&self, id: Uuid) -> Result<bool, DatabaseError>;
}
