use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    NewSubtask, NewTask, NewUser, Subtask, SubtaskChanges, Task, TaskChanges, User,
};
use crate::database::store::Store;
use crate::filter::TaskFilter;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tasks: Vec<Task>,
    subtasks: Vec<Subtask>,
}

/// Process-local store for tests and `--store memory` runs. Rows are kept
/// in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict(format!("email {} is already registered", user.email)));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_tasks(&self, owner: Uuid, filter: &TaskFilter) -> Result<Vec<Task>, DatabaseError> {
        let tables = self.tables.read().await;
        // newest insert first so ties keep newest-first under the stable sort
        let mut tasks: Vec<Task> = tables
            .tasks
            .iter()
            .rev()
            .filter(|t| t.user_id == owner && filter.matches(t))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| filter.sort.compare(a, b));
        Ok(tasks)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn insert_task(&self, owner: Uuid, task: NewTask) -> Result<Task, DatabaseError> {
        let task = Task {
            id: Uuid::new_v4(),
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            user_id: owner,
            created_at: Utc::now(),
        };
        self.tables.write().await.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Option<Task>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.tasks.iter_mut().find(|t| t.id == id).map(|task| {
            changes.apply(task);
            task.clone()
        }))
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.id != id);
        if tables.tasks.len() == before {
            return Ok(false);
        }
        tables.subtasks.retain(|s| s.task_id != id);
        Ok(true)
    }

    async fn list_subtasks(&self, task_id: Uuid) -> Result<Vec<Subtask>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut subtasks: Vec<Subtask> = tables
            .subtasks
            .iter()
            .filter(|s| s.task_id == task_id)
            .cloned()
            .collect();
        subtasks.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(subtasks)
    }

    async fn find_subtask(&self, id: Uuid) -> Result<Option<Subtask>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.subtasks.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_subtask(&self, owner: Uuid, subtask: NewSubtask) -> Result<Subtask, DatabaseError> {
        let mut tables = self.tables.write().await;
        // mirrors the foreign key on the postgres table
        if !tables.tasks.iter().any(|t| t.id == subtask.task_id) {
            return Err(DatabaseError::Conflict(format!("task {} does not exist", subtask.task_id)));
        }
        let subtask = Subtask {
            id: Uuid::new_v4(),
            title: subtask.title,
            completed: false,
            task_id: subtask.task_id,
            user_id: owner,
            created_at: Utc::now(),
        };
        tables.subtasks.push(subtask.clone());
        Ok(subtask)
    }

    async fn update_subtask(&self, id: Uuid, changes: SubtaskChanges) -> Result<Option<Subtask>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.subtasks.iter_mut().find(|s| s.id == id).map(|subtask| {
            changes.apply(subtask);
            subtask.clone()
        }))
    }

    async fn delete_subtask(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.subtasks.len();
        tables.subtasks.retain(|s| s.id != id);
        Ok(tables.subtasks.len() != before)
    }
}
