// handlers/protected/auth.rs - GET /api/auth/me

use axum::Extension;

use crate::database::models::UserProfile;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

pub async fn me(Extension(user): Extension<AuthUser>) -> ApiResult<UserProfile> {
    Ok(ApiResponse::success(UserProfile {
        id: user.id,
        name: user.name,
        email: user.email,
    }))
}
