use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::{Analytics, AnalyticsService};

/// GET /api/analytics - Completion and score statistics for the caller
pub async fn get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Analytics> {
    let analytics = AnalyticsService::new(state.store.clone()).for_user(user.id).await?;
    Ok(ApiResponse::success(analytics))
}
