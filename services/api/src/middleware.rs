//! Authentication middleware for session token validation

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::errors::ErrorKind;
use tracing::{debug, warn};

use crate::{error::ApiError, models::UserRole, state::AppState};

/// Identity asserted by a validated session token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub role: UserRole,
}

/// Extract and validate the bearer token from the Authorization header
///
/// A missing or malformed credential is rejected distinctly from an
/// expired one.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized("Missing authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized("Invalid authorization header"))?;

    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        warn!("Token validation failed: {}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => ApiError::Unauthorized("Token expired"),
            _ => ApiError::Unauthorized("Invalid token"),
        }
    })?;

    let user = AuthUser {
        id: claims.sub,
        username: claims.username,
        role: claims.role,
    };
    debug!("Authenticated request from {} ({})", user.username, user.role);

    // Make the identity available to handlers
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
