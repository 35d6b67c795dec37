//! Post API endpoints.

use crate::auth::middleware::{AppState, AuthSession, WriterSession};
use crate::auth::policy::{self, Action};
use crate::error::AppError;
use crate::models::{
    parse_tags, AuthorInfo, CreatePostRequest, MessageResponse, PostListResponse, PostResponse,
    PostStatus, Role, StoredPost, UpdatePostRequest,
};
use crate::storage;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::collections::HashMap;

/// Query parameters for the public post listing.
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
}

/// Populate author projections for a batch of posts.
async fn populate_authors<C>(
    con: &mut C,
    posts: Vec<StoredPost>,
) -> Result<Vec<PostResponse>, AppError>
where
    C: redis::AsyncCommands,
{
    let mut cache = HashMap::new();
    let mut out = Vec::with_capacity(posts.len());
    for post in posts {
        let author = super::resolve_author(con, &mut cache, &post.author_id).await?;
        out.push(post.with_author(author));
    }
    Ok(out)
}

/// GET /posts — List published posts with pagination and search
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let page = query.page.filter(|&p| p > 0).unwrap_or(1);
    let page_size = query
        .limit
        .filter(|&l| l > 0)
        .unwrap_or(state.config.default_page_size);
    // An empty search term means no filter
    let search = query.search.as_deref().filter(|s| !s.is_empty());

    let (posts, total) = storage::post::list_published(&mut con, page, page_size, search).await?;

    let pages = total.div_ceil(page_size);
    let posts = populate_authors(&mut con, posts).await?;

    Ok(Json(PostListResponse {
        posts,
        page,
        pages,
        total,
    }))
}

/// GET /posts/myposts — List the caller's posts (all posts for an Admin)
pub async fn my_posts(
    WriterSession(session): WriterSession,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let posts = if session.role == Role::Admin {
        storage::post::list_all(&mut con).await?
    } else {
        storage::post::list_by_author(&mut con, &session.user_id).await?
    };

    let posts = populate_authors(&mut con, posts).await?;
    Ok(Json(posts))
}

/// GET /posts/:id — Fetch one post
///
/// Drafts are visible only to their author and admins; everyone else sees
/// 404 so the draft's existence stays hidden.
pub async fn get_post(
    State(state): State<AppState>,
    session: Option<AuthSession>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&id, "post ID")?;

    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let post = storage::post::get_post(&mut con, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let actor = session.as_ref().map(|s| s.actor());
    policy::authorize(actor.as_ref(), Action::ReadPost(&post))
        .require("Post not found or you do not have permission")?;

    let mut cache = HashMap::new();
    let author = super::resolve_author(&mut con, &mut cache, &post.author_id).await?;
    Ok(Json(post.with_author(author)))
}

/// POST /posts — Create a post
pub async fn create_post(
    WriterSession(session): WriterSession,
    State(state): State<AppState>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.title.trim().is_empty() || req.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Title and content are required".to_string(),
        ));
    }

    // The route gate already requires Writer/Admin; the engine is consulted
    // anyway so every mutation goes through the same decision point.
    let actor = session.actor();
    policy::authorize(Some(&actor), Action::CreatePost)
        .require("User role is not authorized to create posts")?;

    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();

    let post = StoredPost {
        id: nanoid::nanoid!(12),
        title: req.title,
        content: req.content,
        tags: req.tags.as_deref().map(parse_tags).unwrap_or_default(),
        status: req.status.unwrap_or(PostStatus::Draft),
        author_id: session.user_id.clone(),
        created_at: now,
        updated_at: now,
    };

    storage::post::store_post(&mut con, &post).await?;

    tracing::info!(
        action = "post_created",
        post_id = %post.id,
        author_id = %session.user_id,
        status = %post.status,
        "Post created"
    );

    let author = AuthorInfo {
        id: session.user_id,
        username: session.username,
    };
    Ok((StatusCode::CREATED, Json(post.with_author(author))))
}

/// PUT /posts/:id — Update a post (author or Admin)
///
/// Omitted or empty fields keep their current value; field updates are
/// last-writer-wins.
pub async fn update_post(
    WriterSession(session): WriterSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&id, "post ID")?;

    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let mut post = storage::post::get_post(&mut con, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let actor = session.actor();
    policy::authorize(Some(&actor), Action::UpdatePost(&post))
        .require("User not authorized to update this post")?;

    if let Some(title) = req.title.filter(|t| !t.trim().is_empty()) {
        post.title = title;
    }
    if let Some(content) = req.content.filter(|c| !c.trim().is_empty()) {
        post.content = content;
    }
    if let Some(tags) = req.tags.filter(|t| !t.trim().is_empty()) {
        post.tags = parse_tags(&tags);
    }
    if let Some(status) = req.status {
        post.status = status;
    }
    post.updated_at = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();

    storage::post::store_post(&mut con, &post).await?;

    tracing::info!(
        action = "post_updated",
        post_id = %post.id,
        user_id = %session.user_id,
        status = %post.status,
        "Post updated"
    );

    let mut cache = HashMap::new();
    let author = super::resolve_author(&mut con, &mut cache, &post.author_id).await?;
    Ok(Json(post.with_author(author)))
}

/// DELETE /posts/:id — Delete a post and all of its comments (author or Admin)
pub async fn delete_post(
    WriterSession(session): WriterSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&id, "post ID")?;

    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let post = storage::post::get_post(&mut con, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let actor = session.actor();
    policy::authorize(Some(&actor), Action::DeletePost(&post))
        .require("User not authorized to delete this post")?;

    // Post and comments go in one atomic unit
    let deleted = storage::post::delete_post_cascade(&mut con, &id).await?;
    if !deleted {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    tracing::info!(
        action = "post_deleted",
        post_id = %id,
        user_id = %session.user_id,
        "Post deleted with its comments"
    );

    Ok(Json(MessageResponse {
        message: "Post removed".to_string(),
    }))
}
