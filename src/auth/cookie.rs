//! Session cookie helpers.
//!
//! The session token rides in an HttpOnly cookie so client-side script never
//! sees it. Clearing a session means replacing the cookie with an already
//! expired one; the token itself is not revoked server-side.

use axum::http::{HeaderMap, HeaderValue};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Extract a cookie value by name from request headers.
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers.get("cookie").or_else(|| headers.get("Cookie"))?;
    let s = cookie.to_str().ok()?;
    for part in s.split(';') {
        let p = part.trim();
        if let Some(eq) = p.find('=') {
            let (k, v) = p.split_at(eq);
            if k == name {
                return Some(v[1..].to_string());
            }
        }
    }
    None
}

/// Build a Set-Cookie value carrying a session token.
///
/// HttpOnly + SameSite=Strict, scoped to path /, with Max-Age matching the
/// token lifetime. The Secure attribute is configurable so local development
/// over plain HTTP still receives the cookie.
pub fn session_cookie(token: &str, max_age_secs: u64, secure: bool) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly;{} SameSite=Strict; Path=/; Max-Age={}",
        SESSION_COOKIE,
        token,
        if secure { " Secure;" } else { "" },
        max_age_secs
    ))
    .unwrap()
}

/// Build a Set-Cookie value that clears the session cookie immediately.
pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly;{} SameSite=Strict; Path=/",
        SESSION_COOKIE,
        if secure { " Secure;" } else { "" },
    ))
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_parse_cookie_single() {
        let headers = headers_with_cookie("session=abc123");
        assert_eq!(parse_cookie(&headers, "session").unwrap(), "abc123");
    }

    #[test]
    fn test_parse_cookie_among_others() {
        let headers = headers_with_cookie("theme=dark; session=tok.sig; lang=en");
        assert_eq!(parse_cookie(&headers, "session").unwrap(), "tok.sig");
    }

    #[test]
    fn test_parse_cookie_missing() {
        let headers = headers_with_cookie("theme=dark");
        assert!(parse_cookie(&headers, "session").is_none());
        assert!(parse_cookie(&HeaderMap::new(), "session").is_none());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let value = session_cookie("tok.sig", 2_592_000, true);
        let s = value.to_str().unwrap();
        assert!(s.starts_with("session=tok.sig;"));
        assert!(s.contains("HttpOnly"));
        assert!(s.contains("Secure"));
        assert!(s.contains("SameSite=Strict"));
        assert!(s.contains("Max-Age=2592000"));
    }

    #[test]
    fn test_session_cookie_without_secure() {
        let value = session_cookie("tok.sig", 60, false);
        let s = value.to_str().unwrap();
        assert!(!s.contains("Secure"));
        assert!(s.contains("HttpOnly"));
    }

    #[test]
    fn test_clear_cookie_expires_in_the_past() {
        let value = clear_session_cookie(true);
        let s = value.to_str().unwrap();
        assert!(s.contains("Expires=Thu, 01 Jan 1970"));
        assert!(s.contains("HttpOnly"));
    }

    #[test]
    fn test_set_then_parse_roundtrip() {
        let set = session_cookie("tok.sig", 60, true);
        // Client echoes back only the name=value pair
        let pair = set.to_str().unwrap().split(';').next().unwrap().to_string();
        let headers = headers_with_cookie(&pair);
        assert_eq!(parse_cookie(&headers, SESSION_COOKIE).unwrap(), "tok.sig");
    }
}
