use axum::extract::State;

use crate::app::AppState;
use crate::database::models::RoutineMap;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::CatalogService;

/// GET /api/routines - `{weekday, saturday, sunday}` schedules
pub async fn list(State(state): State<AppState>) -> ApiResult<RoutineMap> {
    let routines = CatalogService::new(state.store.clone()).routines().await?;
    Ok(ApiResponse::success(routines))
}
