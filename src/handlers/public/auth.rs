// handlers/public/auth.rs - POST /api/auth/register, POST /api/auth/login

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::{generate_jwt, hash_password, verify_password, Claims};
use crate::database::models::{NewUser, User};
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::handlers::JsonBody;
use crate::state::AppState;
use crate::validation;

pub const USER_EXISTS: &str = "User already exists";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// `{ success, token, user }`, the shape both endpoints answer with
fn session(status: StatusCode, user: &User) -> Result<(StatusCode, Json<Value>), ApiError> {
    let token = generate_jwt(&Claims::new(user.id, &user.email)?)?;
    Ok((
        status,
        Json(json!({
            "success": true,
            "token": token,
            "user": user.profile(),
        })),
    ))
}

/**
 * POST /api/auth/register - Create an account and sign it in
 *
 * Input: `{ "name": "Ada", "email": "ada@example.com", "password": "secret1" }`
 * Output (201): `{ "success": true, "token": "eyJ...", "user": { "id", "name", "email" } }`
 */
pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let registration = validation::auth::registration(&body)?;

    if state.store.find_user_by_email(&registration.email).await?.is_some() {
        return Err(ApiError::bad_request(USER_EXISTS));
    }

    let password_hash = hash_password(registration.password).await?;
    let user = state
        .store
        .insert_user(NewUser {
            name: registration.name,
            email: registration.email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            // lost a race with a concurrent registration
            DatabaseError::Conflict(_) => ApiError::bad_request(USER_EXISTS),
            other => other.into(),
        })?;

    tracing::info!("Registered user {}", user.id);
    session(StatusCode::CREATED, &user)
}

/**
 * POST /api/auth/login - Exchange credentials for a token
 *
 * Input: `{ "email": "ada@example.com", "password": "secret1" }`
 * Output (200): `{ "success": true, "token": "eyJ...", "user": { "id", "name", "email" } }`
 *
 * Unknown email and wrong password answer identically.
 */
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let credentials = validation::auth::credentials(&body)?;

    let Some(user) = state.store.find_user_by_email(&credentials.email).await? else {
        tracing::debug!("Login for unknown email");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    if !verify_password(credentials.password, user.password_hash.clone()).await? {
        tracing::warn!("Failed login for user {}", user.id);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    session(StatusCode::OK, &user)
}
