// Endpoints that do not require a token
pub mod auth;
pub mod health;
