/// Error handling for the API server
///
/// Every handler and middleware returns `Result<T, ApiError>`; this module is
/// the single place where failures become HTTP responses.
///
/// # Response Body
///
/// ```json
/// { "message": "Validation failed", "errors": [{ "field": "email", "message": "..." }] }
/// ```
///
/// `errors` appears only for validation failures. Database, token and
/// internal failures also carry diagnostic detail, which the error-detail
/// layer adds as `"error"` outside production (see
/// [`crate::middleware::errors`]).
///
/// # Example
///
/// ```
/// use eventhub_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::{json, Value};
///
/// async fn handler(found: bool) -> ApiResult<Json<Value>> {
///     if !found {
///         return Err(ApiError::NotFound("Event not found".to_string()));
///     }
///     Ok(Json(json!({ "ok": true })))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use eventhub_shared::auth::{
    authorization::AuthzError, jwt::JwtError, middleware::AuthError, password::PasswordError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Message for any role or ownership refusal
pub const FORBIDDEN_MESSAGE: &str = "Not authorized to access this resource";

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Token rejected outside the authentication layer (401)
    InvalidToken(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Duplicate one-to-one profile (400)
    Conflict(String),

    /// Request body failed validation (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Error reported by the database server (400)
    Database(sqlx::Error),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,

    /// Per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationErrorDetail>>,

    /// Diagnostic detail, development only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error body with diagnostic detail filled in
///
/// Attached to error responses as an extension; the error-detail layer swaps
/// it in as the body when detail may be shown.
#[derive(Debug, Clone)]
pub struct DetailedError(pub ErrorResponse);

impl ApiError {
    /// Single-field validation failure
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: field.into(),
            message: message.into(),
        }])
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_)
            | ApiError::Conflict(_)
            | ApiError::ValidationError(_)
            | ApiError::Database(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) | ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Database(err) => write!(f, "Database error: {}", err),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, errors, detail) = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => (msg, None, None),
            ApiError::ValidationError(errors) => {
                ("Validation failed".to_string(), Some(errors), None)
            }
            ApiError::InvalidToken(detail) => {
                tracing::warn!(detail = %detail, "Rejected token");
                ("Invalid token".to_string(), None, Some(detail))
            }
            ApiError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                ("Database error".to_string(), None, Some(err.to_string()))
            }
            ApiError::InternalError(detail) => {
                tracing::error!(detail = %detail, "Internal error");
                ("Server Error".to_string(), None, Some(detail))
            }
        };

        let body = ErrorResponse {
            message,
            errors,
            error: None,
        };
        let detailed = detail.map(|detail| {
            DetailedError(ErrorResponse {
                error: Some(detail),
                ..body.clone()
            })
        });

        let mut response = (status, Json(body)).into_response();
        if let Some(detailed) = detailed {
            response.extensions_mut().insert(detailed);
        }
        response
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(_) => ApiError::Database(err),
            other => ApiError::InternalError(format!("Database unavailable: {}", other)),
        }
    }
}

/// Convert validator errors to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: camel_case(field),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field)),
                })
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(errors)
    }
}

/// Field names are reported the way clients spell them (`start_time` → `startTime`)
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert authentication errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => {
                ApiError::Unauthorized("Not authorized, no token".to_string())
            }
            AuthError::InvalidToken(err) => {
                tracing::debug!(error = %err, "Bearer token rejected");
                ApiError::Unauthorized("Not authorized, token failed".to_string())
            }
        }
    }
}

/// Convert authorization errors to API errors
impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::InsufficientRole { .. } | AuthzError::NotOwner => {
                ApiError::Forbidden(FORBIDDEN_MESSAGE.to_string())
            }
            AuthzError::EmailNotVerified => {
                ApiError::Forbidden("Please verify your email first".to_string())
            }
            AuthzError::UnknownUser(_) => ApiError::NotFound("User not found".to_string()),
            AuthzError::DatabaseError(err) => err.into(),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            other => ApiError::InvalidToken(other.to_string()),
        }
    }
}
