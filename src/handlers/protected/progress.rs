// handlers/protected/progress.rs - the caller's own progress document

use axum::{extract::State, Extension};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::{ProgressData, ProgressPatch};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, CurrentUser};
use crate::services::ProgressService;

/// GET /api/progress - Caller's progress, created empty on first read
pub async fn get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<ProgressData> {
    let data = ProgressService::new(state.store.clone()).load(user.id).await?;
    Ok(ApiResponse::success(data))
}

/// PUT /api/progress - Overwrite the fields present in the body
pub async fn put(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiJson(patch): ApiJson<ProgressPatch>,
) -> ApiResult<Value> {
    ProgressService::new(state.store.clone()).save(user.id, patch).await?;
    Ok(ApiResponse::message("Progress saved successfully"))
}
