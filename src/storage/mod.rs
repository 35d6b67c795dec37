//! Redis storage layer for users, posts, and comments.
//!
//! All functions are async and use redis::AsyncCommands.
//! Records are serialized to JSON for storage in Redis.
//!
//! Key patterns:
//! - `user:{id}` — user record (JSON)
//! - `username:{username}` — username lookup to user id (STRING)
//! - `post:{id}` — post record (JSON)
//! - `posts:all` — ZSET of post ids scored by created_at
//! - `posts:published` — ZSET of published post ids scored by created_at
//! - `posts:author:{user_id}` — SET of post ids authored by the user
//! - `comment:{id}` — comment record (JSON)
//! - `comments:{post_id}` — ZSET of comment ids scored by created_at

pub mod comment;
pub mod post;
pub mod user;

use redis::AsyncCommands;

/// Maximum number of keys returned by scan_keys to prevent unbounded memory allocation.
const SCAN_MAX_KEYS: usize = 10_000;

/// Scan for Redis keys matching a pattern using SCAN (non-blocking).
///
/// Unlike KEYS, SCAN does not block the Redis server during iteration.
/// Capped at SCAN_MAX_KEYS results to prevent unbounded memory growth.
pub async fn scan_keys<C>(con: &mut C, pattern: &str) -> Result<Vec<String>, redis::RedisError>
where
    C: AsyncCommands,
{
    let mut all_keys = Vec::new();
    let mut cursor: u64 = 0;
    loop {
        let (new_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(100)
            .query_async(con)
            .await?;
        all_keys.extend(keys);
        if all_keys.len() >= SCAN_MAX_KEYS {
            all_keys.truncate(SCAN_MAX_KEYS);
            break;
        }
        cursor = new_cursor;
        if cursor == 0 {
            break;
        }
    }
    Ok(all_keys)
}

/// Map a JSON (de)serialization failure into a RedisError.
pub(crate) fn json_error(context: &'static str, err: serde_json::Error) -> redis::RedisError {
    redis::RedisError::from((
        redis::ErrorKind::TypeError,
        context,
        err.to_string(),
    ))
}
