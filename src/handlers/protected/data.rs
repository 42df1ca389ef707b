use axum::extract::State;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{CatalogService, CatalogSnapshot};

/// GET /api/data - Compact view of the whole active catalog
pub async fn get(State(state): State<AppState>) -> ApiResult<CatalogSnapshot> {
    let snapshot = CatalogService::new(state.store.clone()).snapshot().await?;
    Ok(ApiResponse::success(snapshot))
}
