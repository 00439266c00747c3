//! Authentication Handlers
//!
//! Handles login, logout, and current user lookup

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use shared::client::{LoginRequest, LoginResponse, UserInfo};

use crate::api::extract::ApiJson;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::security_log;
use crate::utils::validation::{MAX_NAME_LEN, MAX_PASSWORD_LEN};
use crate::utils::{ApiResponse, AppError};

/// Login handler
///
/// Verifies the configured admin credentials and returns a signed JWT
pub async fn login(
    State(state): State<ServerState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let username = req.username.trim().to_string();

    let within_limits = !username.is_empty()
        && username.chars().count() <= MAX_NAME_LEN
        && req.password.chars().count() <= MAX_PASSWORD_LEN;

    // Oversized input is checked as an unknown user with an empty password,
    // so argon2 always runs exactly once
    let (lookup, password) = if within_limits {
        (username.as_str(), req.password.as_str())
    } else {
        ("", "")
    };
    let authenticated = state
        .accounts
        .authenticate(lookup, password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

    // Fixed delay to prevent timing attacks (before reporting the result)
    tokio::time::sleep(Duration::from_millis(state.config.auth_delay_ms)).await;

    // Unified error message to prevent username enumeration
    let Some(account) = authenticated else {
        let reason = if within_limits && state.accounts.find_by_username(&username).is_some() {
            "invalid_password"
        } else {
            "user_not_found"
        };
        security_log!(WARN, "login_failed", username = %username, reason = reason);
        return Err(AppError::invalid_credentials());
    };

    let issued = state
        .get_jwt_service()
        .generate_token(
            account.id,
            &account.username,
            &account.role,
            &account.permissions,
        )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    security_log!(INFO, "login_success", user_id = account.id, username = %account.username);
    tracing::info!(
        user_id = account.id,
        username = %account.username,
        role = %account.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        success: true,
        message: "Login berhasil".to_string(),
        token: issued.token,
        expires_at: issued.expires_at,
        user: account.to_user_info(),
    }))
}

/// Get current user info
pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserInfo>, AppError> {
    let info = match state.accounts.find_by_id(user.id) {
        Some(account) => account.to_user_info(),
        None => UserInfo {
            id: user.id,
            username: user.username,
            role: user.role,
            permissions: user.permissions,
        },
    };
    Ok(Json(info))
}

/// Logout handler
///
/// Revokes the presented token until it expires
pub async fn logout(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.sessions.revoke(&user.jti, user.expires_at);

    security_log!(INFO, "logout", user_id = user.id, username = %user.username);
    tracing::info!(user_id = user.id, username = %user.username, "User logged out");

    Ok(Json(ApiResponse::ok()))
}
