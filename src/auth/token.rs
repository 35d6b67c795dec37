//! Stateless signed session tokens.
//!
//! A token is `base64url(claims_json) + "." + base64url(signature)` where the
//! signature is Ed25519 over the claims bytes. The server keeps no session
//! state: identity is a verified claim recomputed on every request. Logout is
//! therefore client-side only — a copied token stays valid until `exp`.

use crate::error::AppError;
use base64::{engine::general_purpose, Engine as _};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

/// Claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id the session is bound to.
    pub sub: String,
    /// Absolute expiry, unix seconds.
    pub exp: u64,
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Sign claims into a token string.
fn encode(key: &SigningKey, claims: &SessionClaims) -> Result<String, AppError> {
    let payload = serde_json::to_vec(claims)?;
    let signature = key.sign(&payload);

    Ok(format!(
        "{}.{}",
        general_purpose::URL_SAFE_NO_PAD.encode(&payload),
        general_purpose::URL_SAFE_NO_PAD.encode(signature.to_bytes())
    ))
}

/// Issue a session token for a user, expiring `ttl_secs` from now.
pub fn issue(key: &SigningKey, user_id: &str, ttl_secs: u64) -> Result<String, AppError> {
    let claims = SessionClaims {
        sub: user_id.to_string(),
        exp: unix_now() + ttl_secs,
    };
    encode(key, &claims)
}

/// Verify a token and return the embedded user id.
///
/// Fails with `Unauthorized` if the token is malformed, the signature does
/// not check out, or the expiry has passed.
pub fn verify(key: &VerifyingKey, token: &str) -> Result<String, AppError> {
    let (payload_b64, signature_b64) = token
        .split_once('.')
        .ok_or_else(|| AppError::Unauthorized("Malformed session token".to_string()))?;

    let payload = general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| AppError::Unauthorized("Malformed session token".to_string()))?;

    let signature_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AppError::Unauthorized("Malformed session token".to_string()))?;

    let signature_array: [u8; 64] = signature_bytes
        .try_into()
        .map_err(|_| AppError::Unauthorized("Malformed session token".to_string()))?;
    let signature = Signature::from_bytes(&signature_array);

    // Constant-time comparison is built into ed25519-dalek
    key.verify(&payload, &signature)
        .map_err(|_| AppError::Unauthorized("Invalid session token".to_string()))?;

    let claims: SessionClaims = serde_json::from_slice(&payload)
        .map_err(|_| AppError::Unauthorized("Malformed session token".to_string()))?;

    if claims.exp <= unix_now() {
        return Err(AppError::Unauthorized("Session expired".to_string()));
    }

    Ok(claims.sub)
}
