use axum::extract::State;

use crate::app::AppState;
use crate::database::models::Subject;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::CatalogService;

/// GET /api/subjects - Active subjects in display order
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Subject>> {
    let subjects = CatalogService::new(state.store.clone()).subjects().await?;
    Ok(ApiResponse::success(subjects))
}
