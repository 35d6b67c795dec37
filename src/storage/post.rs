//! Post Redis operations.
//!
//! Redis key patterns:
//! - `post:{nanoid}` — post data (JSON)
//! - `posts:all` — ZSET of post ids scored by created_at
//! - `posts:published` — ZSET of published post ids scored by created_at
//! - `posts:author:{user_id}` — SET of post ids owned by the user

use crate::models::{PostStatus, StoredPost};
use redis::AsyncCommands;

/// Maximum number of ids walked when listing, mirroring the scan cap.
const LIST_MAX_POSTS: isize = 10_000;

/// Store a post and maintain the listing indexes.
///
/// Works for both creation and update: the published index is added to or
/// purged depending on the current status, so a draft never lingers there.
pub async fn store_post<C>(con: &mut C, post: &StoredPost) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("post:{}", post.id);
    let json = serde_json::to_string(post).map_err(|e| super::json_error("JSON serialize", e))?;

    con.set::<_, _, ()>(&key, json).await?;
    con.zadd::<_, _, _, ()>("posts:all", &post.id, post.created_at)
        .await?;
    con.sadd::<_, _, ()>(format!("posts:author:{}", post.author_id), &post.id)
        .await?;

    match post.status {
        PostStatus::Published => {
            con.zadd::<_, _, _, ()>("posts:published", &post.id, post.created_at)
                .await?;
        }
        PostStatus::Draft => {
            con.zrem::<_, _, ()>("posts:published", &post.id).await?;
        }
    }

    Ok(())
}

/// Get a post by ID.
pub async fn get_post<C>(con: &mut C, id: &str) -> Result<Option<StoredPost>, redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("post:{}", id);
    let json: Option<String> = con.get(&key).await?;

    match json {
        Some(data) => {
            let post = serde_json::from_str(&data)
                .map_err(|e| super::json_error("JSON deserialize", e))?;
            Ok(Some(post))
        }
        None => Ok(None),
    }
}

/// Load posts for a list of ids, skipping ids whose record has vanished.
async fn load_posts<C>(con: &mut C, ids: Vec<String>) -> Result<Vec<StoredPost>, redis::RedisError>
where
    C: AsyncCommands,
{
    let mut posts = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(post) = get_post(con, &id).await? {
            posts.push(post);
        }
    }
    Ok(posts)
}

/// List published posts, newest first, with pagination and optional search.
///
/// The search term matches case-insensitively against title or content.
/// Pages are 1-based; an out-of-range page yields an empty slice. Returns
/// the page slice and the total number of matches.
pub async fn list_published<C>(
    con: &mut C,
    page: usize,
    page_size: usize,
    search: Option<&str>,
) -> Result<(Vec<StoredPost>, usize), redis::RedisError>
where
    C: AsyncCommands,
{
    // ZREVRANGE yields newest-first since scores are creation times
    let ids: Vec<String> = con
        .zrevrange("posts:published", 0, LIST_MAX_POSTS - 1)
        .await?;
    let mut posts = load_posts(con, ids).await?;

    if let Some(term) = search {
        let needle = term.to_lowercase();
        posts.retain(|p| {
            p.title.to_lowercase().contains(&needle) || p.content.to_lowercase().contains(&needle)
        });
    }

    let total = posts.len();
    let page = page.max(1);
    let slice = posts
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    Ok((slice, total))
}

/// List all posts by one author, newest first.
pub async fn list_by_author<C>(
    con: &mut C,
    author_id: &str,
) -> Result<Vec<StoredPost>, redis::RedisError>
where
    C: AsyncCommands,
{
    let ids: Vec<String> = con
        .smembers(format!("posts:author:{}", author_id))
        .await?;
    let mut posts = load_posts(con, ids).await?;
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    Ok(posts)
}

/// List every post in the system, newest first. Used for the admin view.
pub async fn list_all<C>(con: &mut C) -> Result<Vec<StoredPost>, redis::RedisError>
where
    C: AsyncCommands,
{
    let ids: Vec<String> = con.zrevrange("posts:all", 0, LIST_MAX_POSTS - 1).await?;
    load_posts(con, ids).await
}

/// Delete a post and all of its comments as one atomic unit.
///
/// A single Lua script removes the post record, its index entries, every
/// comment record, and the comment index, so a concurrent reader can never
/// observe the post gone while its comments remain (or the reverse).
///
/// Returns true if the post was deleted, false if it didn't exist.
pub async fn delete_post_cascade<C>(con: &mut C, id: &str) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let post_key = format!("post:{}", id);
    let comments_key = format!("comments:{}", id);

    // Key prefixes passed as ARGV to avoid hardcoding in Lua
    let script = redis::Script::new(
        r#"
        local val = redis.call('GET', KEYS[1])
        if not val then
            return 0
        end
        redis.call('DEL', KEYS[1])
        redis.call('ZREM', ARGV[2], ARGV[1])
        redis.call('ZREM', ARGV[3], ARGV[1])
        local obj = cjson.decode(val)
        if type(obj.author_id) == 'string' then
            redis.call('SREM', ARGV[4] .. obj.author_id, ARGV[1])
        end
        local comment_ids = redis.call('ZRANGE', KEYS[2], 0, -1)
        for i, cid in ipairs(comment_ids) do
            redis.call('DEL', ARGV[5] .. cid)
        end
        redis.call('DEL', KEYS[2])
        return 1
        "#,
    );

    let deleted: i32 = script
        .key(&post_key)
        .key(&comments_key)
        .arg(id)
        .arg("posts:all")
        .arg("posts:published")
        .arg("posts:author:")
        .arg("comment:")
        .invoke_async(con)
        .await?;

    Ok(deleted > 0)
}
