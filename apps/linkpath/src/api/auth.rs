//! # Authentication Module
//!
//! API key authentication for topology writes.
//!
//! When `server.api_key` (or `LINKPATH_API_KEY`) is set, `PUT /topology`
//! requires the key in the Authorization header:
//! ```text
//! Authorization: Bearer <your-api-key>
//! ```
//! Queries, `/status` and `/health` stay open.

use super::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

// =============================================================================
// KEY COMPARISON
// =============================================================================

/// Compare a provided key with the expected one in constant time.
///
/// Both keys are padded to the same length so the comparison always covers
/// the same number of bytes.
#[must_use]
pub fn keys_match(provided: &str, expected: &str) -> bool {
    let provided_bytes = provided.as_bytes();
    let expected_bytes = expected.as_bytes();

    let max_len = provided_bytes.len().max(expected_bytes.len());
    let mut padded_provided = vec![0u8; max_len];
    let mut padded_expected = vec![0u8; max_len];
    padded_provided[..provided_bytes.len()].copy_from_slice(provided_bytes);
    padded_expected[..expected_bytes.len()].copy_from_slice(expected_bytes);

    let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
    bytes_match && provided_bytes.len() == expected_bytes.len()
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

/// Reject requests without the configured API key.
///
/// Accepts both `Bearer <key>` and a raw `<key>`. With no key configured,
/// every request passes.
pub async fn api_key_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let Some(expected) = state.config.api_key() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v));

    match provided {
        Some(key) if keys_match(key, expected) => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!(
                event = "auth_failure",
                reason = "invalid_api_key",
                "Authentication failed: invalid API key"
            );
            Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
        None => {
            tracing::warn!(
                event = "auth_failure",
                reason = "missing_authorization_header",
                "Missing Authorization header"
            );
            Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_keys_match() {
        assert!(keys_match("secret", "secret"));
    }

    #[test]
    fn prefix_does_not_match() {
        assert!(!keys_match("secret", "secret-longer"));
        assert!(!keys_match("secret-longer", "secret"));
        assert!(!keys_match("", "secret"));
    }

    #[test]
    fn different_keys_same_length() {
        assert!(!keys_match("secreT", "secret"));
    }
}
