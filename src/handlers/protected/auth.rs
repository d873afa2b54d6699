use axum::Extension;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::permission::User;

/// GET /api/auth/whoami - the user behind the bearer token
pub async fn whoami(Extension(auth_user): Extension<AuthUser>) -> ApiResult<User> {
    Ok(ApiResponse::success(auth_user.user))
}
