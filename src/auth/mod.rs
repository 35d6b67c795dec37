//! Authentication and authorization.
//!
//! - `password`: argon2 hashing and verification of login credentials
//! - `token`: stateless Ed25519-signed session tokens
//! - `cookie`: the HTTP-only session cookie carrying the token
//! - `policy`: the pure authorization decision function
//! - `middleware`: Axum extractors that tie the above together

pub mod cookie;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod token;
