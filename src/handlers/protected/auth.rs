use axum::Extension;

use crate::database::models::PublicUser;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};

/// GET /api/auth/me - Public projection of the caller
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResult<PublicUser> {
    Ok(ApiResponse::success(PublicUser::from(&user)))
}
