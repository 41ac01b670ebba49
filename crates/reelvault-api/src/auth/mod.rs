//! Bearer-token authentication
//!
//! Handlers call [`authenticate`] explicitly so the order of checks in the
//! upload pipeline (id, then token, then body) stays visible at the call site.

pub mod jwt;
pub mod models;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use reelvault_core::AppError;

pub use jwt::JwtService;
pub use models::{AuthenticatedUser, JwtClaims};

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn get_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Malformed authorization header".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Malformed authorization header".to_string()))?;

    Ok(token)
}

/// Resolve the caller from request headers.
pub fn authenticate(jwt: &JwtService, headers: &HeaderMap) -> Result<AuthenticatedUser, AppError> {
    let token = get_bearer_token(headers)?;
    let user_id = jwt.validate(token)?;
    Ok(AuthenticatedUser { user_id })
}
