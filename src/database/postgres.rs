use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    NewSubtask, NewTask, NewUser, Subtask, SubtaskChanges, Task, TaskChanges, User,
};
use crate::database::store::Store;
use crate::filter::TaskFilter;

const SCHEMA: [&str; 5] = [
    r#"CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS tasks (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        status TEXT NOT NULL CHECK (status IN ('To-Do', 'In Progress', 'Completed')),
        priority TEXT NOT NULL CHECK (priority IN ('Low', 'Medium', 'High')),
        due_date TIMESTAMPTZ NOT NULL,
        user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    "CREATE INDEX IF NOT EXISTS tasks_user_id_idx ON tasks (user_id)",
    r#"CREATE TABLE IF NOT EXISTS subtasks (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL CHECK (char_length(title) <= 100),
        completed BOOLEAN NOT NULL DEFAULT FALSE,
        task_id UUID NOT NULL REFERENCES tasks (id) ON DELETE CASCADE,
        user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    "CREATE INDEX IF NOT EXISTS subtasks_task_id_idx ON subtasks (task_id)",
];

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";
const TASK_COLUMNS: &str = "id, title, description, status, priority, due_date, user_id, created_at";
const SUBTASK_COLUMNS: &str = "id, title, completed, task_id, user_id, created_at";

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    status: String,
    priority: String,
    due_date: DateTime<Utc>,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = DatabaseError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status.parse().map_err(|e| DatabaseError::Decode(format!("task {}: {}", row.id, e)))?,
            priority: row.priority.parse().map_err(|e| DatabaseError::Decode(format!("task {}: {}", row.id, e)))?,
            due_date: row.due_date,
            user_id: row.user_id,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct SubtaskRow {
    id: Uuid,
    title: String,
    completed: bool,
    task_id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<SubtaskRow> for Subtask {
    fn from(row: SubtaskRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            completed: row.completed,
            task_id: row.task_id,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates missing tables and indexes
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map(User::from)
            .map_err(|e| {
                if DatabaseError::is_unique_violation(&e) {
                    DatabaseError::Conflict(format!("email {} is already registered", user.email))
                } else {
                    DatabaseError::Sqlx(e)
                }
            })
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn list_tasks(&self, owner: Uuid, filter: &TaskFilter) -> Result<Vec<Task>, DatabaseError> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM tasks WHERE user_id = ", TASK_COLUMNS));
        query.push_bind(owner);
        if !filter.status.is_empty() {
            query.push(" AND status = ANY(").push_bind(filter.status.clone()).push(")");
        }
        if !filter.priority.is_empty() {
            query.push(" AND priority = ANY(").push_bind(filter.priority.clone()).push(")");
        }
        query.push(" ").push(filter.sort.to_sql());

        let rows = query.build_query_as::<TaskRow>().fetch_all(&self.pool).await?;
        rows.into_iter().map(Task::try_from).collect()
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, DatabaseError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Task::try_from).transpose()
    }

    async fn insert_task(&self, owner: Uuid, task: NewTask) -> Result<Task, DatabaseError> {
        let sql = format!(
            "INSERT INTO tasks (id, title, description, status, priority, due_date, user_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            TASK_COLUMNS
        );
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status.as_str())
            .bind(task.priority.as_str())
            .bind(task.due_date)
            .bind(owner)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Task::try_from(row)
    }

    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Option<Task>, DatabaseError> {
        let sql = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                status = COALESCE($5, status),
                priority = COALESCE($6, priority),
                due_date = COALESCE($7, due_date)
             WHERE id = $1 RETURNING {}",
            TASK_COLUMNS
        );
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.description.is_some())
            .bind(changes.description.flatten())
            .bind(changes.status.map(|s| s.as_str()))
            .bind(changes.priority.map(|p| p.as_str()))
            .bind(changes.due_date)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Task::try_from).transpose()
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, DatabaseError> {
        // subtasks follow through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_subtasks(&self, task_id: Uuid) -> Result<Vec<Subtask>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM subtasks WHERE task_id = $1 ORDER BY created_at ASC",
            SUBTASK_COLUMNS
        );
        let rows = sqlx::query_as::<_, SubtaskRow>(&sql)
            .bind(task_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Subtask::from).collect())
    }

    async fn find_subtask(&self, id: Uuid) -> Result<Option<Subtask>, DatabaseError> {
        let sql = format!("SELECT {} FROM subtasks WHERE id = $1", SUBTASK_COLUMNS);
        let row = sqlx::query_as::<_, SubtaskRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Subtask::from))
    }

    async fn insert_subtask(&self, owner: Uuid, subtask: NewSubtask) -> Result<Subtask, DatabaseError> {
        let sql = format!(
            "INSERT INTO subtasks (id, title, completed, task_id, user_id, created_at)
             VALUES ($1, $2, FALSE, $3, $4, $5) RETURNING {}",
            SUBTASK_COLUMNS
        );
        let row = sqlx::query_as::<_, SubtaskRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&subtask.title)
            .bind(subtask.task_id)
            .bind(owner)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if DatabaseError::is_foreign_key_violation(&e) {
                    DatabaseError::Conflict(format!("task {} does not exist", subtask.task_id))
                } else {
                    DatabaseError::Sqlx(e)
                }
            })?;
        Ok(Subtask::from(row))
    }

    async fn update_subtask(&self, id: Uuid, changes: SubtaskChanges) -> Result<Option<Subtask>, DatabaseError> {
        let sql = format!(
            "UPDATE subtasks SET
                title = COALESCE($2, title),
                completed = COALESCE($3, completed)
             WHERE id = $1 RETURNING {}",
            SUBTASK_COLUMNS
        );
        let row = sqlx::query_as::<_, SubtaskRow>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.completed)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Subtask::from))
    }

    async fn delete_subtask(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM subtasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
