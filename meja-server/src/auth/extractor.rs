//! JWT Extractor
//!
//! Custom extractor for automatically validating JWT tokens

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::{CurrentUser, JwtService, middleware::authenticate};
use crate::core::ServerState;
use crate::security_log;

/// JWT Auth Extractor
///
/// Use this extractor in protected handlers to get the CurrentUser
/// inserted by `require_auth`, validating the token itself if needed
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                security_log!(WARN, "auth_missing", uri = %parts.uri);
                return Err(AppError::unauthorized());
            }
        };

        let user = authenticate(state, token, &parts.uri)?;

        // Store in extensions for potential reuse
        parts.extensions.insert(user.clone());

        Ok(user)
    }
}
