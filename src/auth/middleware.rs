//! Axum extractors for authentication.

use crate::auth::cookie::{parse_cookie, SESSION_COOKIE};
use crate::auth::policy::Actor;
use crate::auth::token;
use crate::config::Config;
use crate::error::AppError;
use crate::models::Role;
use crate::storage;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub redis: redis::Client,
    pub config: Arc<Config>,
}

/// Authenticated session extractor.
///
/// Reads the session cookie, verifies the signed token, and loads the user
/// record so the role is always the stored one, not a stale claim.
/// Returns 401 Unauthorized if any step fails.
pub struct AuthSession {
    pub user_id: String,
    pub username: String,
    pub role: Role,
}

impl AuthSession {
    /// The acting identity for authorization checks.
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id.clone(),
            role: self.role,
        }
    }
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Extract session cookie
        let token = parse_cookie(&parts.headers, SESSION_COOKIE)
            .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".to_string()))?;

        // Verify signature and expiry; yields the embedded user id
        let user_id = token::verify(&state.config.session_key.verifying_key(), &token)?;

        // Get Redis connection
        let mut con = state
            .redis
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

        // Look up the user; a valid token for a vanished user is still 401
        let user = storage::user::get_user(&mut con, &user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Not authorized, token failed".to_string()))?;

        Ok(AuthSession {
            user_id: user.id,
            username: user.username,
            role: user.role,
        })
    }
}

/// Optional authenticated session extractor.
///
/// Returns Some(AuthSession) if a valid session cookie is present, None
/// otherwise. Does not fail the request if auth is missing or invalid.
impl FromRequestParts<AppState> for Option<AuthSession> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Try to extract auth session, but don't fail if it's not present
        match AuthSession::from_request_parts(parts, state).await {
            Ok(session) => Ok(Some(session)),
            Err(_) => Ok(None),
        }
    }
}

/// Writer-or-Admin session extractor.
///
/// Extracts the session and verifies the role may author posts.
/// Returns 403 Forbidden otherwise.
pub struct WriterSession(pub AuthSession);

impl FromRequestParts<AppState> for WriterSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // First extract the auth session
        let session = AuthSession::from_request_parts(parts, state).await?;

        // Check the role gate
        if !session.role.can_write() {
            return Err(AppError::Forbidden(format!(
                "User role '{}' is not authorized to access this route",
                session.role
            )));
        }

        Ok(WriterSession(session))
    }
}
