//! Admin session authentication.
//!
//! The admin console is gated by an `admin_token` cookie whose value must
//! match the configured sentinel. Comparison is constant-time.

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Name of the admin session cookie.
pub const ADMIN_COOKIE: &str = "admin_token";

/// Session lifetime in seconds (one day).
pub const SESSION_MAX_AGE: u64 = 86_400;

const BCRYPT_COST: u32 = 10;

/// Admin gate for the console routes, taking the expected cookie value as a parameter.
pub async fn admin_auth_layer(expected_token: String, request: Request, next: Next) -> Response {
    match cookie_value(request.headers(), ADMIN_COOKIE) {
        Some(provided) if constant_time_compare(&provided, &expected_token) => {
            next.run(request).await
        }
        Some(_) => {
            tracing::debug!("Rejected admin request with invalid session cookie");
            AppError::Unauthorized("Unauthorized".to_string()).into_response()
        }
        None => AppError::Unauthorized("Unauthorized".to_string()).into_response(),
    }
}

/// Find a cookie by name across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
}

/// `Set-Cookie` value that opens an admin session.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        ADMIN_COOKIE, token, SESSION_MAX_AGE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that ends the admin session.
pub fn clear_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax", ADMIN_COOKIE)
}

/// Hash a password with bcrypt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored bcrypt hash. Malformed hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("logged_in", "logged_in"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("logged_in", "logged_out"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-token"));
        assert!(!constant_time_compare("", "logged_in"));
    }

    #[test]
    fn test_cookie_value_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; admin_token=logged_in; other=1"),
        );
        assert_eq!(
            cookie_value(&headers, ADMIN_COOKIE).as_deref(),
            Some("logged_in")
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_cookie_value_requires_exact_name() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("not_admin_token=logged_in"),
        );
        assert_eq!(cookie_value(&headers, ADMIN_COOKIE), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("logged_in", false);
        assert!(cookie.starts_with("admin_token=logged_in;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(!cookie.contains("Secure"));
        assert!(session_cookie("logged_in", true).ends_with("; Secure"));
        assert!(clear_cookie().contains("Max-Age=0"));
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
        assert!(!verify_password("hunter22", "not-a-bcrypt-hash"));
    }
}
