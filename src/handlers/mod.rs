// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (bearer JWT, owner-scoped)
pub mod public;    // /, /health, /api/auth/register, /api/auth/login
pub mod protected; // /api/auth/me, /api/tasks/*, /api/subtasks/*

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ApiError;

pub const INVALID_JSON: &str = "Invalid JSON body";

/// Request body as loose JSON. An empty body reads as `{}` so that field
/// rules, not the parser, report what is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            ApiError::bad_request(INVALID_JSON)
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(Value::Object(Map::new())));
        }
        if !is_json {
            tracing::debug!("Rejected non-JSON request body");
            return Err(ApiError::bad_request(INVALID_JSON));
        }

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            tracing::debug!("Rejected request body: {}", e);
            ApiError::bad_request(INVALID_JSON)
        })
    }
}

/// `application/json` or any `+json` media type
fn json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}

/// Ids that are not UUIDs can never match a document
pub(crate) fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
