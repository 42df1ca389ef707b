// handlers/elevated/admin.rs - user administration and global settings

use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{Setting, UserSummary};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::services::catalog_service::parse_id;
use crate::services::CatalogService;

#[derive(Debug, Deserialize)]
pub struct SettingBody {
    #[serde(default)]
    pub value: Value,
}

/// GET /api/admin/users - Every account, without password hashes
pub async fn users_list(State(state): State<AppState>) -> ApiResult<Vec<UserSummary>> {
    let users = state.store.list_users().await?;
    Ok(ApiResponse::success(users.into_iter().map(UserSummary::from).collect()))
}

/// PUT /api/admin/users/:id/admin - Flip a user's admin flag
pub async fn user_toggle_admin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id).ok_or_else(|| ApiError::not_found("User not found"))?;
    let is_admin = state
        .store
        .toggle_admin(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    tracing::info!("Admin flag for user {} set to {}", id, is_admin);
    Ok(ApiResponse::success(json!({
        "message": "Admin status updated",
        "isAdmin": is_admin
    })))
}

/// DELETE /api/admin/tasks/:id - Soft delete a task
pub async fn task_delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    CatalogService::new(state.store.clone()).delete_task(&id).await?;
    Ok(ApiResponse::message("Task deleted"))
}

/// DELETE /api/admin/tests/:id - Soft delete a test
pub async fn test_delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    CatalogService::new(state.store.clone()).delete_test(&id).await?;
    Ok(ApiResponse::message("Test deleted"))
}

/// GET /api/admin/settings - All settings ordered by key
pub async fn settings_list(State(state): State<AppState>) -> ApiResult<Vec<Setting>> {
    Ok(ApiResponse::success(state.store.list_settings().await?))
}

/// GET /api/admin/settings/:key
pub async fn setting_get(State(state): State<AppState>, Path(key): Path<String>) -> ApiResult<Setting> {
    let setting = state
        .store
        .find_setting(&key)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Setting '{}' not found", key)))?;
    Ok(ApiResponse::success(setting))
}

/// PUT /api/admin/settings/:key - Create or replace a setting's value
pub async fn setting_put(
    State(state): State<AppState>,
    Path(key): Path<String>,
    ApiJson(body): ApiJson<SettingBody>,
) -> ApiResult<Setting> {
    let setting = state.store.put_setting(&key, &body.value).await?;
    Ok(ApiResponse::success(setting))
}
