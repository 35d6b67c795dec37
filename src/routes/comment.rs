//! Comment API endpoints.

use crate::auth::middleware::{AppState, AuthSession};
use crate::auth::policy::{self, Action};
use crate::error::AppError;
use crate::models::{AuthorInfo, CreateCommentRequest, MessageResponse, StoredComment};
use crate::storage;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;

/// GET /comments/:post_id — List comments on a post, newest first
///
/// Public; an unknown post id yields an empty list rather than an error.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&post_id, "post ID")?;

    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let comments = storage::comment::list_for_post(&mut con, &post_id).await?;

    let mut cache = HashMap::new();
    let mut out = Vec::with_capacity(comments.len());
    for comment in comments {
        let author = super::resolve_author(&mut con, &mut cache, &comment.author_id).await?;
        out.push(comment.with_author(author));
    }

    Ok(Json(out))
}

/// POST /comments/:post_id — Comment on a published post
pub async fn create_comment(
    session: AuthSession,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&post_id, "post ID")?;

    if req.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Comment content is required".to_string(),
        ));
    }

    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let post = storage::post::get_post(&mut con, &post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let actor = session.actor();
    policy::authorize(Some(&actor), Action::CreateComment(&post))
        .require("Cannot comment on an unpublished post")?;

    let comment = StoredComment {
        id: nanoid::nanoid!(12),
        content: req.content,
        author_id: session.user_id.clone(),
        post_id,
        created_at: std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs(),
    };

    storage::comment::store_comment(&mut con, &comment).await?;

    tracing::info!(
        action = "comment_created",
        comment_id = %comment.id,
        post_id = %comment.post_id,
        author_id = %session.user_id,
        "Comment created"
    );

    let author = AuthorInfo {
        id: session.user_id,
        username: session.username,
    };
    Ok((StatusCode::CREATED, Json(comment.with_author(author))))
}

/// DELETE /comments/:comment_id — Delete a comment (author or Admin)
pub async fn delete_comment(
    session: AuthSession,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&comment_id, "comment ID")?;

    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let comment = storage::comment::get_comment(&mut con, &comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    let actor = session.actor();
    policy::authorize(Some(&actor), Action::DeleteComment(&comment))
        .require("User not authorized to delete this comment")?;

    let deleted = storage::comment::delete_comment(&mut con, &comment_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Comment not found".to_string()));
    }

    tracing::info!(
        action = "comment_deleted",
        comment_id = %comment_id,
        user_id = %session.user_id,
        "Comment deleted"
    );

    Ok(Json(MessageResponse {
        message: "Comment removed".to_string(),
    }))
}
