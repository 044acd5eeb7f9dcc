use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    NewSubtask, NewTask, NewUser, Subtask, SubtaskChanges, Task, TaskChanges, User,
};
use crate::database::store::Store;
use crate::filter::TaskFilter;

/// Store whose every call fails as if the pool could not hand out a connection
pub(crate) struct UnreachableStore;

fn down<T>() -> Result<T, DatabaseError> {
    Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl Store for UnreachableStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        down()
    }

    async fn insert_user(&self, _user: NewUser) -> Result<User, DatabaseError> {
        down()
    }

    async fn find_user(&self, _id: Uuid) -> Result<Option<User>, DatabaseError> {
        down()
    }

    async fn find_user_by_email(&self, _email: &str) -> Result<Option<User>, DatabaseError> {
        down()
    }

    async fn list_tasks(&self, _owner: Uuid, _filter: &TaskFilter) -> Result<Vec<Task>, DatabaseError> {
        down()
    }

    async fn find_task(&self, _id: Uuid) -> Result<Option<Task>, DatabaseError> {
        down()
    }

    async fn insert_task(&self, _owner: Uuid, _task: NewTask) -> Result<Task, DatabaseError> {
        down()
    }

    async fn update_task(&self, _id: Uuid, _changes: TaskChanges) -> Result<Option<Task>, DatabaseError> {
        down()
    }

    async fn delete_task(&self, _id: Uuid) -> Result<bool, DatabaseError> {
        down()
    }

    async fn list_subtasks(&self, _task_id: Uuid) -> Result<Vec<Subtask>, DatabaseError> {
        down()
    }

    async fn find_subtask(&self, _id: Uuid) -> Result<Option<Subtask>, DatabaseError> {
        down()
    }

    async fn insert_subtask(&self, _owner: Uuid, _subtask: NewSubtask) -> Result<Subtask, DatabaseError> {
        down()
    }

    async fn update_subtask(&self, _id: Uuid, _changes: SubtaskChanges) -> Result<Option<Subtask>, DatabaseError> {
        down()
    }

    async fn delete_subtask(&self, _id: Uuid) -> Result<bool, DatabaseError> {
        down()
    }
}
