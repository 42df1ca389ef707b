// handlers/public/auth.rs - account registration and login

use axum::extract::State;

use crate::app::AppState;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::services::account_service::{LoginRequest, RegisterRequest};
use crate::services::{AccountService, AuthSession};

/// POST /api/auth/register - Create an account and return `{token, user}` (201)
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> ApiResult<AuthSession> {
    let service = AccountService::new(state.store.clone(), &state.config.security);
    let session = service.register(body).await?;
    Ok(ApiResponse::created(session))
}

/// POST /api/auth/login - Exchange email and password for `{token, user}`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<AuthSession> {
    let service = AccountService::new(state.store.clone(), &state.config.security);
    Ok(ApiResponse::success(service.login(body).await?))
}
