/// Request authentication context
///
/// This module turns an `Authorization: Bearer <token>` header into an
/// [`AuthContext`]. The axum layers in the API crate call
/// [`authenticate_headers`] and insert the context into request extensions;
/// handlers read it back with `Extension<AuthContext>`.
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use eventhub_shared::auth::jwt::{create_token, Claims};
/// use eventhub_shared::auth::middleware::authenticate_headers;
/// use eventhub_shared::models::user::Role;
/// use chrono::Duration;
///
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let claims = Claims::new(9, "ada@example.com", Role::Admin, Duration::hours(1));
/// let token = create_token(&claims, secret).unwrap();
///
/// let mut headers = HeaderMap::new();
/// headers.insert(
///     header::AUTHORIZATION,
///     HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
/// );
///
/// let auth = authenticate_headers(&headers, secret).unwrap();
/// assert_eq!(auth.user_id, 9);
/// assert_eq!(auth.role, Role::Admin);
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_token, Claims, JwtError};
use crate::models::user::Role;

/// Authenticated caller, decoded from the bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i32,

    /// Email address at token issue time
    pub email: String,

    /// Role at token issue time
    pub role: Role,
}

impl AuthContext {
    /// Creates auth context from validated JWT claims
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header, or not a Bearer credential
    #[error("Missing bearer credentials")]
    MissingCredentials,

    /// Token failed signature, expiry or issuer checks
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),
}

/// Extracts the token from an `Authorization: Bearer <token>` header
///
/// Returns `None` when the header is absent, not valid UTF-8, uses another
/// scheme, or carries an empty token.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authenticates a request from its headers
///
/// # Errors
///
/// - `AuthError::MissingCredentials` if there is no bearer token
/// - `AuthError::InvalidToken` if the token does not validate
pub fn authenticate_headers(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = extract_bearer_token(headers).ok_or(AuthError::MissingCredentials)?;
    let claims = validate_token(token, secret)?;

    Ok(AuthContext::from_claims(claims))
}
