//! Sample data import/destroy for local development.
//!
//! `inkpost seed` clears and imports a known dataset: three users (one per
//! role), three posts (one draft), and two comments. `inkpost seed -d` only
//! destroys. Not intended for production use.

use crate::auth::password;
use crate::models::{PostStatus, Role, StoredComment, StoredPost, StoredUser};
use crate::storage;
use redis::AsyncCommands;

/// Key patterns owned by the application.
const KEY_PATTERNS: &[&str] = &[
    "user:*",
    "username:*",
    "post:*",
    "posts:*",
    "comment:*",
    "comments:*",
];

/// Delete every application key.
pub async fn destroy<C>(con: &mut C) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    for pattern in KEY_PATTERNS {
        let keys = storage::scan_keys(con, pattern).await?;
        for key in keys {
            con.del::<_, ()>(&key).await?;
        }
    }
    tracing::info!(action = "seed_destroy", "All application data cleared");
    Ok(())
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Clear existing data and import the sample dataset.
pub async fn import<C>(con: &mut C) -> Result<(), String>
where
    C: AsyncCommands,
{
    destroy(con).await.map_err(|e| e.to_string())?;

    let now = unix_now();

    let sample_users = [
        ("admin", Role::Admin),
        ("writer", Role::Writer),
        ("reader", Role::Reader),
    ];

    let mut user_ids = Vec::new();
    for (username, role) in sample_users {
        let user = StoredUser {
            id: nanoid::nanoid!(12),
            username: username.to_string(),
            password_hash: password::hash_password("password123")
                .map_err(|e| format!("hash failed: {}", e))?,
            role,
            created_at: now,
        };
        storage::user::create_user(con, &user)
            .await
            .map_err(|e| e.to_string())?;
        user_ids.push(user.id);
    }
    let (admin_id, writer_id, reader_id) = (&user_ids[0], &user_ids[1], &user_ids[2]);
    tracing::info!(action = "seed_users", count = user_ids.len(), "Users imported");

    let sample_posts = [
        (
            "Welcome to the Blog!",
            "This is the first post on our new platform. We are excited to have you here. This post is published.",
            "welcome,news",
            PostStatus::Published,
            writer_id,
        ),
        (
            "A Guide to Async Rust",
            "Async Rust is a powerful way to write network services. This post will explore its features.",
            "rust,tech,backend",
            PostStatus::Published,
            writer_id,
        ),
        (
            "My First Draft",
            "This is just a draft. It is not visible to readers yet. I am still working on it.",
            "draft,writing",
            PostStatus::Draft,
            admin_id,
        ),
    ];

    let mut post_ids = Vec::new();
    for (i, (title, content, tags, status, author_id)) in sample_posts.into_iter().enumerate() {
        let post = StoredPost {
            id: nanoid::nanoid!(12),
            title: title.to_string(),
            content: content.to_string(),
            tags: crate::models::parse_tags(tags),
            status,
            author_id: author_id.to_string(),
            // Stagger creation times so the listing order is deterministic
            created_at: now + i as u64,
            updated_at: now + i as u64,
        };
        storage::post::store_post(con, &post)
            .await
            .map_err(|e| e.to_string())?;
        post_ids.push(post.id);
    }
    tracing::info!(action = "seed_posts", count = post_ids.len(), "Posts imported");

    let sample_comments = [
        ("Great first post! Looking forward to more.", reader_id, &post_ids[0]),
        ("Well said. Async Rust is fantastic.", admin_id, &post_ids[1]),
    ];

    for (content, author_id, post_id) in sample_comments {
        let comment = StoredComment {
            id: nanoid::nanoid!(12),
            content: content.to_string(),
            author_id: author_id.to_string(),
            post_id: post_id.to_string(),
            created_at: now,
        };
        storage::comment::store_comment(con, &comment)
            .await
            .map_err(|e| e.to_string())?;
    }
    tracing::info!(action = "seed_comments", count = 2, "Comments imported");

    Ok(())
}
