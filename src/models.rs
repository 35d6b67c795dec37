//! Request, response, and storage models for the API.
//!
//! All models use serde for serialization/deserialization.
//! Storage models represent the JSON records kept in Redis.

use serde::{Deserialize, Serialize};

// ============================================================================
// Auth Models
// ============================================================================

/// Request to register a new account.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// Defaults to Reader if omitted.
    pub role: Option<Role>,
}

/// Request to log in with username and password.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public projection of a user (never includes the password hash).
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub role: Role,
}

// ============================================================================
// Post Models
// ============================================================================

/// Request to create a post.
///
/// Tags arrive as a free-text comma-separated string.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub tags: Option<String>,
    pub status: Option<PostStatus>,
}

/// Request to update a post. Omitted fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
    pub status: Option<PostStatus>,
}

/// Author reference embedded in post and comment responses.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorInfo {
    pub id: String,
    pub username: String,
}

/// Post as returned by the API, with the author populated.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub author: AuthorInfo,
    pub created_at: u64,
    pub updated_at: u64,
}

/// One page of published posts.
#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}

// ============================================================================
// Comment Models
// ============================================================================

/// Request to create a comment.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

/// Comment as returned by the API, with the author populated.
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub content: String,
    pub author: AuthorInfo,
    pub post_id: String,
    pub created_at: u64,
}

/// Generic success message body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Storage Models
// ============================================================================

/// User record as stored in Redis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: u64,
}

/// Post record as stored in Redis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub author_id: String,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Comment record as stored in Redis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredComment {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub post_id: String,
    pub created_at: u64,
}

// ============================================================================
// Roles and Statuses
// ============================================================================

/// User role types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Reader,
    Writer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Reader => "Reader",
            Role::Writer => "Writer",
            Role::Admin => "Admin",
        }
    }

    /// Whether this role may author posts.
    pub fn can_write(&self) -> bool {
        matches!(self, Role::Writer | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Reader" => Ok(Role::Reader),
            "Writer" => Ok(Role::Writer),
            "Admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Post visibility status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalize a comma-separated tag string into trimmed, non-empty tags.
///
/// Order is preserved; empty segments are dropped.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl StoredPost {
    /// Build the API projection with the author populated.
    pub fn with_author(self, author: AuthorInfo) -> PostResponse {
        PostResponse {
            id: self.id,
            title: self.title,
            content: self.content,
            tags: self.tags,
            status: self.status,
            author,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl StoredComment {
    /// Build the API projection with the author populated.
    pub fn with_author(self, author: AuthorInfo) -> CommentResponse {
        CommentResponse {
            id: self.id,
            content: self.content,
            author,
            post_id: self.post_id,
            created_at: self.created_at,
        }
    }
}
