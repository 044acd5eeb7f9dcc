// handlers/protected/subtasks.rs - /api/subtasks
//
// Access to a subtask list, and the right to add to it, follows ownership of
// the parent task. Edits and deletes check the subtask's own owner.

use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::Value;

use crate::auth::ensure_owner;
use crate::database::models::{NewSubtask, Subtask};
use crate::error::ApiError;
use crate::handlers::protected::tasks::load_task;
use crate::handlers::{parse_id, JsonBody};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::validation;

pub const NOT_FOUND: &str = "Subtask not found";
pub const NOT_AUTHORIZED_ACCESS: &str = "Not authorized to access this task";
pub const NOT_AUTHORIZED_ADD: &str = "Not authorized to add subtasks to this task";
pub const NOT_AUTHORIZED_UPDATE: &str = "Not authorized to update this subtask";
pub const NOT_AUTHORIZED_DELETE: &str = "Not authorized to delete this subtask";

async fn load_subtask(state: &AppState, raw_id: &str) -> Result<Subtask, ApiError> {
    let id = parse_id(raw_id).ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    state
        .store
        .find_subtask(id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// GET /api/subtasks/task/:taskId - oldest first
pub async fn list_by_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(task_id): Path<String>,
) -> ApiResult<Vec<Subtask>> {
    let task = load_task(&state, &task_id).await?;
    ensure_owner(&task, user.id, NOT_AUTHORIZED_ACCESS)?;

    let subtasks = state.store.list_subtasks(task.id).await?;
    Ok(ApiResponse::success(subtasks))
}

/// POST /api/subtasks `{ title, task }`
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(body): JsonBody,
) -> ApiResult<Subtask> {
    let draft = validation::subtask::new_subtask(&body)?;

    let task = load_task(&state, &draft.task).await?;
    ensure_owner(&task, user.id, NOT_AUTHORIZED_ADD)?;

    let subtask = state
        .store
        .insert_subtask(
            user.id,
            NewSubtask {
                title: draft.title,
                task_id: task.id,
            },
        )
        .await?;
    tracing::info!("User {} added subtask {} to task {}", user.id, subtask.id, task.id);
    Ok(ApiResponse::created(subtask))
}

/// PUT /api/subtasks/:id `{ title?, completed? }`
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Subtask> {
    let changes = validation::subtask::subtask_changes(&body)?;

    let subtask = load_subtask(&state, &id).await?;
    ensure_owner(&subtask, user.id, NOT_AUTHORIZED_UPDATE)?;

    let updated = state
        .store
        .update_subtask(subtask.id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/subtasks/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let subtask = load_subtask(&state, &id).await?;
    ensure_owner(&subtask, user.id, NOT_AUTHORIZED_DELETE)?;

    if !state.store.delete_subtask(subtask.id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(ApiResponse::empty())
}
