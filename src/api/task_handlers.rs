//! Task Handlers
//!
//! Owner-scoped CRUD over the task store. Every operation takes the
//! authenticated caller as an explicit argument and goes through a scoped
//! store method, so no query can be constructed without the owner filter.
//! Cross-owner access is indistinguishable from nonexistence: both are 404.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::models::{TaskPatch, TaskPayload, TaskResponse};

use super::AppState;

/// Handler for GET /tasks
///
/// Returns the caller's tasks in insertion order.
pub async fn list_tasks_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<TaskResponse>>> {
    let tasks = state.tasks.read().await;
    let rows = tasks
        .list_for_owner(user.id)
        .into_iter()
        .map(TaskResponse::from)
        .collect();
    Ok(Json(rows))
}

/// Handler for POST /tasks
///
/// The owner is bound from the caller; a `user` field in the payload is
/// ignored. After the row is stored, exactly one notification is enqueued;
/// the response does not wait for the worker.
pub async fn create_task_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<TaskPayload>,
) -> Result<(StatusCode, Json<TaskResponse>)> {
    let title = payload.validate().map_err(ApiError::Validation)?;
    let completed = payload.completed.unwrap_or(false);

    let task = {
        let mut tasks = state.tasks.write().await;
        tasks.insert(user.id, title, completed)
    };

    state.notifier.enqueue(task.id);

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

/// Handler for GET /tasks/:id
pub async fn retrieve_task_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<u64>,
) -> Result<Json<TaskResponse>> {
    let tasks = state.tasks.read().await;
    tasks
        .get_owned(id, user.id)
        .map(TaskResponse::from)
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Handler for PUT /tasks/:id
///
/// Full replace. `id`, owner and `created_date` are immutable; any supplied
/// values for them are ignored and `updated_date` is recomputed.
pub async fn replace_task_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<u64>,
    Json(payload): Json<TaskPayload>,
) -> Result<Json<TaskResponse>> {
    let title = payload.validate().map_err(ApiError::Validation)?;
    let completed = payload.completed.unwrap_or(false);

    let mut tasks = state.tasks.write().await;
    tasks
        .replace_owned(id, user.id, title, completed)
        .map(TaskResponse::from)
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Handler for PATCH /tasks/:id
pub async fn patch_task_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<u64>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<TaskResponse>> {
    let title = patch.validate().map_err(ApiError::Validation)?;

    let mut tasks = state.tasks.write().await;
    tasks
        .patch_owned(id, user.id, title, patch.completed)
        .map(TaskResponse::from)
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Handler for DELETE /tasks/:id
pub async fn delete_task_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    let mut tasks = state.tasks.write().await;
    if tasks.delete_owned(id, user.id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
