// Endpoints behind jwt_auth_middleware. Every handler receives the caller as
// Extension<AuthUser> and authorizes with auth::ensure_owner before mutating.
pub mod auth;
pub mod subtasks;
pub mod tasks;
