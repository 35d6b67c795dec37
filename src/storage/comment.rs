//! Comment Redis operations.
//!
//! Redis key patterns:
//! - `comment:{nanoid}` — comment data (JSON)
//! - `comments:{post_id}` — ZSET of comment ids scored by created_at

use crate::models::StoredComment;
use redis::AsyncCommands;

/// Store a comment and add it to its post's index.
pub async fn store_comment<C>(con: &mut C, comment: &StoredComment) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("comment:{}", comment.id);
    let json =
        serde_json::to_string(comment).map_err(|e| super::json_error("JSON serialize", e))?;

    con.set::<_, _, ()>(&key, json).await?;
    con.zadd::<_, _, _, ()>(
        format!("comments:{}", comment.post_id),
        &comment.id,
        comment.created_at,
    )
    .await?;

    Ok(())
}

/// Get a comment by ID.
pub async fn get_comment<C>(
    con: &mut C,
    id: &str,
) -> Result<Option<StoredComment>, redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("comment:{}", id);
    let json: Option<String> = con.get(&key).await?;

    match json {
        Some(data) => {
            let comment = serde_json::from_str(&data)
                .map_err(|e| super::json_error("JSON deserialize", e))?;
            Ok(Some(comment))
        }
        None => Ok(None),
    }
}

/// List all comments on a post, newest first.
///
/// An unknown post id simply yields an empty list.
pub async fn list_for_post<C>(
    con: &mut C,
    post_id: &str,
) -> Result<Vec<StoredComment>, redis::RedisError>
where
    C: AsyncCommands,
{
    let ids: Vec<String> = con
        .zrevrange(format!("comments:{}", post_id), 0, -1)
        .await?;

    let mut comments = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(comment) = get_comment(con, &id).await? {
            comments.push(comment);
        }
    }
    Ok(comments)
}

/// Delete a comment and remove it from its post's index.
///
/// Uses a Lua script to atomically fetch the record (for post_id), delete
/// it, and ZREM it from the post's comment index.
///
/// Returns true if the comment was deleted, false if it didn't exist.
pub async fn delete_comment<C>(con: &mut C, id: &str) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("comment:{}", id);

    let script = redis::Script::new(
        r#"
        local val = redis.call('GET', KEYS[1])
        if not val then
            return 0
        end
        redis.call('DEL', KEYS[1])
        local obj = cjson.decode(val)
        if type(obj.post_id) == 'string' then
            redis.call('ZREM', ARGV[2] .. obj.post_id, ARGV[1])
        end
        return 1
        "#,
    );

    let deleted: i32 = script
        .key(&key)
        .arg(id)
        .arg("comments:")
        .invoke_async(con)
        .await?;

    Ok(deleted > 0)
}
