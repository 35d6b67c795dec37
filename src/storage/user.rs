//! User Redis operations.
//!
//! Redis key patterns:
//! - `user:{nanoid}` — individual user data (JSON)
//! - `username:{username}` — username lookup to user_id (STRING)
//!
//! User records carry password hashes, so deserialized JSON is wrapped in
//! `zeroize::Zeroizing` and cleared after use. Redis keeps its own copy; this
//! protects the application's memory only.

use crate::models::StoredUser;
use redis::AsyncCommands;
use zeroize::Zeroizing;

/// Create a user, enforcing username uniqueness.
///
/// The username lookup key is claimed with SET NX first, so two concurrent
/// registrations for the same name cannot both succeed. Returns false (and
/// stores nothing) if the username is already taken.
pub async fn create_user<C>(con: &mut C, user: &StoredUser) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let username_key = format!("username:{}", user.username);
    let claimed: bool = con.set_nx(&username_key, &user.id).await?;
    if !claimed {
        return Ok(false);
    }

    let user_key = format!("user:{}", user.id);
    let json =
        serde_json::to_string(user).map_err(|e| super::json_error("JSON serialize", e))?;
    con.set::<_, _, ()>(&user_key, json).await?;

    Ok(true)
}

/// Get a user by ID.
///
/// The user JSON is zeroized after deserialization.
pub async fn get_user<C>(con: &mut C, id: &str) -> Result<Option<StoredUser>, redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("user:{}", id);
    let json: Option<String> = con.get(&key).await?;

    match json {
        Some(data) => {
            // Wrap the JSON string in Zeroizing to clear it after use
            let zeroizing_data = Zeroizing::new(data);
            let user = serde_json::from_str(&zeroizing_data)
                .map_err(|e| super::json_error("JSON deserialize", e))?;
            Ok(Some(user))
        }
        None => Ok(None),
    }
}

/// Get a user by username.
///
/// Performs a two-step lookup: username -> user_id -> user data.
pub async fn get_user_by_username<C>(
    con: &mut C,
    username: &str,
) -> Result<Option<StoredUser>, redis::RedisError>
where
    C: AsyncCommands,
{
    let username_key = format!("username:{}", username);
    let user_id: Option<String> = con.get(&username_key).await?;

    match user_id {
        Some(id) => get_user(con, &id).await,
        None => Ok(None),
    }
}
