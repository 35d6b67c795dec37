//! API route handlers.

pub mod auth;
pub mod comment;
pub mod post;

use crate::auth::middleware::AppState;
use crate::error::AppError;
use crate::models::AuthorInfo;
use crate::storage;
use axum::{
    routing::{get, post as post_route},
    Router,
};
use redis::AsyncCommands;
use std::collections::HashMap;

/// Length of the nanoid ids used for users, posts, and comments.
pub const ID_LEN: usize = 12;

/// Validate that a string is a valid nanoid (alphanumeric, hyphens, underscores).
pub fn validate_id(id: &str, label: &str) -> Result<(), AppError> {
    if id.len() != ID_LEN
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::BadRequest(format!("Invalid {} format", label)));
    }
    Ok(())
}

/// Resolve an author id to its response projection, caching lookups so list
/// endpoints hit Redis once per distinct author.
pub(crate) async fn resolve_author<C>(
    con: &mut C,
    cache: &mut HashMap<String, AuthorInfo>,
    author_id: &str,
) -> Result<AuthorInfo, AppError>
where
    C: AsyncCommands,
{
    if let Some(author) = cache.get(author_id) {
        return Ok(author.clone());
    }

    let author = match storage::user::get_user(con, author_id).await? {
        Some(user) => AuthorInfo {
            id: user.id,
            username: user.username,
        },
        // Users are never deleted by any exposed operation, but a missing
        // record must not take the whole listing down.
        None => AuthorInfo {
            id: author_id.to_string(),
            username: String::new(),
        },
    };
    cache.insert(author_id.to_string(), author.clone());
    Ok(author)
}

/// Build the API router with all endpoints.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Auth endpoints
        .route("/auth/register", post_route(auth::register))
        .route("/auth/login", post_route(auth::login))
        .route("/auth/logout", post_route(auth::logout))
        .route("/auth/me", get(auth::me))
        // Post endpoints
        .route("/posts", get(post::list_posts).post(post::create_post))
        .route("/posts/myposts", get(post::my_posts))
        .route(
            "/posts/{id}",
            get(post::get_post)
                .put(post::update_post)
                .delete(post::delete_post),
        )
        // Comment endpoints. GET and POST address a post id, DELETE a
        // comment id; axum needs them on one route since the shapes match.
        .route(
            "/comments/{id}",
            get(comment::list_comments)
                .post(comment::create_comment)
                .delete(comment::delete_comment),
        )
}
