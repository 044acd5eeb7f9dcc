// handlers/protected/tasks.rs - /api/tasks
//
// Every route is scoped to the caller. Mutations check, in order:
// body validation (400) → task lookup (404) → ownership (401).

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension,
};
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::ensure_owner;
use crate::database::models::{Task, TaskStats};
use crate::error::ApiError;
use crate::filter::{TaskFilter, TaskQuery};
use crate::handlers::{parse_id, JsonBody};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::validation;

pub const NOT_FOUND: &str = "Task not found";
pub const NOT_AUTHORIZED_UPDATE: &str = "Not authorized to update this task";
pub const NOT_AUTHORIZED_DELETE: &str = "Not authorized to delete this task";

/// Resolves `:id` to a task, treating ids that cannot exist as missing
pub(crate) async fn load_task(state: &AppState, raw_id: &str) -> Result<Task, ApiError> {
    let id: Uuid = parse_id(raw_id).ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    state
        .store
        .find_task(id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// GET /api/tasks?status=&priority=&sort=
///
/// `status` and `priority` may repeat; a task matches when it has any of the values.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Vec<Task>> {
    let Query(pairs) = query.map_err(|rejection| {
        tracing::debug!("Rejected query string: {}", rejection.body_text());
        ApiError::bad_request("Invalid query string")
    })?;
    let filter = TaskFilter::from(TaskQuery::from_pairs(pairs));
    tracing::debug!("Listing tasks for {} with {:?}", user.id, filter);

    let tasks = state.store.list_tasks(user.id, &filter).await?;
    Ok(ApiResponse::list(tasks))
}

/// GET /api/tasks/stats - dashboard counters over every task the caller owns
pub async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<TaskStats> {
    let tasks = state.store.list_tasks(user.id, &TaskFilter::default()).await?;
    Ok(ApiResponse::success(TaskStats::collect(&tasks, Utc::now())))
}

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(body): JsonBody,
) -> ApiResult<Task> {
    let draft = validation::task::new_task(&body)?;

    let task = state.store.insert_task(user.id, draft).await?;
    tracing::info!("User {} created task {}", user.id, task.id);
    Ok(ApiResponse::created(task))
}

/// PUT /api/tasks/:id - partial update; absent fields keep their value
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Task> {
    let changes = validation::task::task_changes(&body)?;

    let task = load_task(&state, &id).await?;
    ensure_owner(&task, user.id, NOT_AUTHORIZED_UPDATE)?;

    let updated = state
        .store
        .update_task(task.id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/tasks/:id - removes the task and its subtasks
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let task = load_task(&state, &id).await?;
    ensure_owner(&task, user.id, NOT_AUTHORIZED_DELETE)?;

    if !state.store.delete_task(task.id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    tracing::info!("User {} deleted task {}", user.id, task.id);
    Ok(ApiResponse::empty())
}
