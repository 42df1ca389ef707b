// handlers/elevated/catalog.rs - admin writes to the shared catalog

use axum::{
    extract::{Path, State},
    Extension,
};
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::{MockTest, MockTestInput, Routine, ScheduleEntry, Subject, SubjectInput};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, CurrentUser};
use crate::services::{CatalogService, CatalogSync};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoutineBody {
    pub schedule: Vec<ScheduleEntry>,
}

/// PUT /api/data - Bulk sync of subjects, tasks, tests and routines
///
/// Sections that are absent are not touched. Subjects are reconciled by name;
/// task and test items with a known id are updated, all others are created.
pub async fn sync(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiJson(body): ApiJson<CatalogSync>,
) -> ApiResult<Value> {
    CatalogService::new(state.store.clone()).sync(body, user.id).await?;
    tracing::info!("Catalog synced by {}", user.email);
    Ok(ApiResponse::message("Data updated successfully"))
}

/// POST /api/subjects - Create a subject at the end of the list (201)
pub async fn subject_create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SubjectInput>,
) -> ApiResult<Subject> {
    let subject = CatalogService::new(state.store.clone())
        .create_subject(&input)
        .await?;
    Ok(ApiResponse::created(subject))
}

/// PUT /api/subjects/:id - Partial update; `null` when no such subject
pub async fn subject_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<SubjectInput>,
) -> ApiResult<Option<Subject>> {
    let subject = CatalogService::new(state.store.clone())
        .update_subject(&id, &input)
        .await?;
    Ok(ApiResponse::success(subject))
}

/// DELETE /api/subjects/:id - Soft delete
pub async fn subject_delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    CatalogService::new(state.store.clone()).delete_subject(&id).await?;
    Ok(ApiResponse::message("Subject deleted"))
}

/// POST /api/tests - Create a test (201)
pub async fn test_create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<MockTestInput>,
) -> ApiResult<MockTest> {
    let test = CatalogService::new(state.store.clone()).create_test(&input).await?;
    Ok(ApiResponse::created(test))
}

/// PUT /api/tests/:id - Partial update; `null` when no such test
pub async fn test_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<MockTestInput>,
) -> ApiResult<Option<MockTest>> {
    let test = CatalogService::new(state.store.clone())
        .update_test(&id, &input)
        .await?;
    Ok(ApiResponse::success(test))
}

/// PUT /api/routines/:type - Replace one routine's schedule
pub async fn routine_put(
    State(state): State<AppState>,
    Path(routine_type): Path<String>,
    ApiJson(body): ApiJson<RoutineBody>,
) -> ApiResult<Routine> {
    let routine = CatalogService::new(state.store.clone())
        .replace_routine(&routine_type, &body.schedule)
        .await?;
    Ok(ApiResponse::success(routine))
}
