//! Security headers middleware.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

/// Middleware that adds security headers to all responses.
///
/// - **X-Content-Type-Options: nosniff** forces browsers to respect the
///   declared Content-Type instead of sniffing.
/// - **X-Frame-Options: DENY** prevents the API responses from being framed.
/// - **Referrer-Policy: no-referrer** keeps URLs out of outbound requests.
/// - **Strict-Transport-Security** pins HTTPS for two years including
///   subdomains.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=63072000; includeSubDomains; preload"),
    );

    response
}
