// handlers/protected/tasks.rs - task CRUD, open to every authenticated caller

use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::{Task, TaskFilter, TaskInput};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, CurrentUser};
use crate::services::CatalogService;

#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    /// Month number, `2` or `02`
    pub month: Option<String>,
    pub subject: Option<String>,
}

/// GET /api/tasks - Active tasks by date, optionally filtered by month and subject
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> ApiResult<Vec<Task>> {
    let filter = TaskFilter::from_query(query.month.as_deref(), query.subject)?;
    let tasks = CatalogService::new(state.store.clone()).tasks(&filter).await?;
    Ok(ApiResponse::success(tasks))
}

/// POST /api/tasks - Create a task owned by the caller (201)
pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiJson(input): ApiJson<TaskInput>,
) -> ApiResult<Task> {
    let task = CatalogService::new(state.store.clone())
        .create_task(&input, user.id)
        .await?;
    Ok(ApiResponse::created(task))
}

/// PUT /api/tasks/:id - Partial update; `null` when no such task
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<TaskInput>,
) -> ApiResult<Option<Task>> {
    let task = CatalogService::new(state.store.clone())
        .update_task(&id, &input)
        .await?;
    Ok(ApiResponse::success(task))
}

/// DELETE /api/tasks/:id - Soft delete
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    CatalogService::new(state.store.clone()).delete_task(&id).await?;
    Ok(ApiResponse::message("Task deleted"))
}
