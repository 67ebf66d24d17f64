//! Authentication routes: registration, login with lockout, identity

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::{error, info, warn};

use crate::{
    error::ApiError,
    jwt::JwtService,
    middleware::AuthUser,
    models::{LoginRequest, LoginResponse, NewUser, RegisterRequest, UserResponse, UserStatus},
    repositories::{AuditLogRepository, UserRepository},
    state::AppState,
    validation,
};

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_registration(&payload).map_err(ApiError::Validation)?;
    let role = payload.role.parse().map_err(ApiError::Validation)?;

    let existing = state
        .user_repository
        .find_by_username(&payload.username)
        .await
        .map_err(|e| {
            error!("Failed to look up username: {}", e);
            ApiError::Internal
        })?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    let user = state
        .user_repository
        .create(&NewUser {
            username: payload.username,
            password: payload.password,
            role,
        })
        .await
        .map_err(|e| {
            error!("Failed to create user: {}", e);
            ApiError::Internal
        })?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// User login endpoint
///
/// Unexpected failures are logged with full context and surfaced as a
/// uniform internal error without leaking detail.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Login attempt for username: {}", payload.username);

    let response = authenticate(
        &state.user_repository,
        &state.audit_log,
        &state.jwt_service,
        &payload,
    )
    .await?;

    Ok(Json(response))
}

/// Credential verification with progressive lockout
///
/// The lockout check precedes password verification so a locked
/// account never reveals whether the supplied password was correct.
pub(crate) async fn authenticate(
    users: &UserRepository,
    audit_log: &AuditLogRepository,
    jwt_service: &JwtService,
    payload: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let user = users
        .find_by_username(&payload.username)
        .await
        .map_err(|e| {
            error!("Unexpected error during login: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| {
            warn!("Login failed: user '{}' not found", payload.username);
            ApiError::Unauthorized("Invalid credentials")
        })?;

    if user.status == UserStatus::Locked {
        warn!("Login failed: account '{}' is locked", payload.username);
        return Err(ApiError::Forbidden(
            "Account locked due to too many failed attempts".to_string(),
        ));
    }

    let valid = users
        .verify_password(&user, &payload.password)
        .await
        .map_err(|e| {
            error!("Unexpected error during login: {}", e);
            ApiError::Internal
        })?;

    if !valid {
        let attempts = users
            .record_failed_attempt(&payload.username)
            .await
            .map_err(|e| {
                error!("Unexpected error during login: {}", e);
                ApiError::Internal
            })?;
        warn!(
            "Login failed: invalid password for '{}' (attempt {})",
            payload.username, attempts
        );
        if attempts >= crate::repositories::user::MAX_FAILED_ATTEMPTS {
            audit_log
                .record("Account locked", &payload.username, None, None)
                .await;
        }
        return Err(ApiError::Unauthorized("Invalid credentials"));
    }

    users
        .record_successful_login(&payload.username)
        .await
        .map_err(|e| {
            error!("Unexpected error during login: {}", e);
            ApiError::Internal
        })?;

    info!("Login successful for user: {}", payload.username);

    let token = jwt_service.generate_token(&user).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::Internal
    })?;

    // Re-read so the profile reflects the reset counter and login stamp
    let user = users
        .find_by_username(&payload.username)
        .await
        .map_err(|e| {
            error!("Unexpected error during login: {}", e);
            ApiError::Internal
        })?
        .ok_or(ApiError::Unauthorized("Invalid credentials"))?;

    Ok(LoginResponse {
        token,
        user: UserResponse::from(user),
    })
}

/// Current user profile from a validated token
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_id(&identity.id)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Logout acknowledgment; tokens are stateless and simply expire
pub async fn logout(Extension(identity): Extension<AuthUser>) -> impl IntoResponse {
    info!("Logout for user: {}", identity.username);
    Json(json!({"message": "Logged out successfully"}))
}
