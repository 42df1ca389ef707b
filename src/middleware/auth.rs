use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::validate_jwt;
use crate::database::models::User;
use crate::error::ApiError;

/// Caller resolved from the bearer token, attached to every protected request
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Identity gate: verifies the bearer token and resolves it to a stored user.
/// Any failure halts the request with 401.
pub async fn require_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    let claims = validate_jwt(token, &state.config.security).map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        ApiError::unauthorized("Invalid token")
    })?;

    let user = state
        .store
        .find_user_by_id(claims.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Admin gate. Must run after `require_user`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let current = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    if !current.0.is_admin {
        tracing::warn!(
            "Admin access denied for {} on {} {}",
            current.0.email,
            request.method(),
            request.uri().path()
        );
        return Err(ApiError::forbidden("Admin access required"));
    }

    Ok(next.run(request).await)
}

/// Token from an `Authorization: Bearer <token>` header, if present and non-empty
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
