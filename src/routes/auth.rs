//! Auth API endpoints.

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::middleware::{AppState, AuthSession};
use crate::auth::{password, token};
use crate::error::AppError;
use crate::models::{
    LoginRequest, MessageResponse, RegisterRequest, Role, StoredUser, UserResponse,
};
use crate::storage;
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

/// Validate a username: 2-64 characters, alphanumeric plus hyphen/underscore.
fn validate_username(username: &str) -> Result<(), AppError> {
    if username.len() < 2 || username.len() > 64 {
        return Err(AppError::BadRequest(
            "Username must be 2-64 characters".to_string(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::BadRequest(
            "Username may only contain alphanumeric characters, hyphens, and underscores"
                .to_string(),
        ));
    }
    Ok(())
}

/// Build the Set-Cookie response headers for a fresh session.
fn session_headers(state: &AppState, user_id: &str) -> Result<HeaderMap, AppError> {
    let token = token::issue(
        &state.config.session_key,
        user_id,
        state.config.session_ttl_secs,
    )?;
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        session_cookie(
            &token,
            state.config.session_ttl_secs,
            state.config.cookie_secure,
        ),
    );
    Ok(headers)
}

/// POST /auth/register — Create an account and start a session
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_username(&req.username)?;
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    // Hash before touching storage; the plaintext never leaves this handler
    let password_hash = password::hash_password(&req.password)?;

    let user = StoredUser {
        id: nanoid::nanoid!(12),
        username: req.username,
        password_hash,
        role: req.role.unwrap_or(Role::Reader),
        created_at: std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs(),
    };

    // SET NX on the username key arbitrates concurrent registrations
    let created = storage::user::create_user(&mut con, &user).await?;
    if !created {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    tracing::info!(action = "user_registered", user_id = %user.id, username = %user.username, role = %user.role, "New user registered");

    let headers = session_headers(&state, &user.id)?;

    Ok((
        StatusCode::CREATED,
        headers,
        Json(UserResponse {
            id: user.id,
            username: user.username,
            role: user.role,
        }),
    ))
}

/// POST /auth/login — Verify credentials and start a session
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    // Unknown username and wrong password are deliberately indistinguishable
    let user = storage::user::get_user_by_username(&mut con, &req.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

    if !password::verify_password(&user.password_hash, &req.password) {
        tracing::warn!(action = "auth_failed", username = %req.username, "Invalid password");
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    tracing::info!(action = "auth_success", user_id = %user.id, username = %user.username, role = %user.role, "User authenticated");

    let headers = session_headers(&state, &user.id)?;

    Ok((
        StatusCode::OK,
        headers,
        Json(UserResponse {
            id: user.id,
            username: user.username,
            role: user.role,
        }),
    ))
}

/// POST /auth/logout — Clear the session cookie
///
/// The server holds no revocation list: the issued token stays
/// cryptographically valid until its natural expiry, so logout only
/// instructs this client to discard its copy.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, clear_session_cookie(state.config.cookie_secure));

    tracing::info!(action = "logout", "Session cookie cleared");

    (
        StatusCode::OK,
        headers,
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

/// GET /auth/me — Current user from the session
pub async fn me(session: AuthSession) -> impl IntoResponse {
    Json(UserResponse {
        id: session.user_id,
        username: session.username,
        role: session.role,
    })
}
