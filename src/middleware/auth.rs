use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::validate_jwt;
use crate::error::ApiError;
use crate::state::AppState;

pub const NO_TOKEN: &str = "Not authorized, no token";
pub const TOKEN_FAILED: &str = "Not authorized, token failed";

/// Caller identity resolved from the bearer token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Verifies the bearer token and loads its user before any protected handler runs
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(&headers).ok_or_else(|| ApiError::unauthorized(NO_TOKEN))?;

    let claims = validate_jwt(token).map_err(|e| {
        tracing::warn!("Rejected bearer token: {}", e);
        ApiError::unauthorized(TOKEN_FAILED)
    })?;

    // Tokens outlive deleted accounts, so the user must still exist
    let user = match state.store.find_user(claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!("Bearer token for unknown user {}", claims.sub);
            return Err(ApiError::unauthorized(TOKEN_FAILED));
        }
        Err(e) => {
            tracing::error!("User lookup for bearer token failed: {}", e);
            return Err(ApiError::unauthorized(TOKEN_FAILED));
        }
    };

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        name: user.name,
        email: user.email,
    });

    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
