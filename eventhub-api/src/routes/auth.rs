/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Create a USER account and get a token
/// - `POST /auth/login` - Exchange credentials for a token
/// - `GET /auth/verify-email/:token` - Consume an emailed verification token
/// - `GET /auth/me` - Current user profile (authenticated)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::validation::ValidatedJson,
    routes::MessageResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use eventhub_shared::{
    auth::{
        jwt::{self, Claims},
        middleware::AuthContext,
        password, verification,
    },
    models::user::{CreateUser, Role, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register and login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,

    /// Signed access token
    pub token: String,

    pub user: User,
}

/// Current user response
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
}

/// Register a new user
///
/// Creates a `USER` account with an outstanding verification token and
/// emails the verification link. A mail failure is logged and does not fail
/// the registration.
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "email": "ada@example.com",
///   "password": "secret1",
///   "firstName": "Ada",
///   "lastName": "Lovelace"
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "message": "User registered successfully",
///   "token": "eyJ...",
///   "user": { "id": 1, "email": "ada@example.com", "role": "USER", "isEmailVerified": false, ... }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, or the email is taken
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;
    let (verification_token, token_digest) = verification::generate_verification_token();

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            role: Role::User,
            verification_token: Some(token_digest),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    if let Err(err) = state
        .mailer
        .send_verification_email(&user.email, &verification_token)
        .await
    {
        tracing::warn!(user_id = user.id, error = %err, "Failed to send verification email");
    }

    let token = issue_token(&state, &user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            token,
            user,
        }),
    ))
}

/// Login with email and password
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// { "email": "ada@example.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `401 Unauthorized`: unknown email or wrong password (same message for both)
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = User::find_by_email(&state.db, &req.email).await?;

    let valid = password::verify_login(
        &req.password,
        user.as_ref().map(|u| u.password_hash.as_str()),
    )?;

    let user = match user {
        Some(user) if valid => user,
        _ => {
            tracing::debug!("Login rejected");
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }
    };

    let token = issue_token(&state, &user)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user,
    }))
}

/// Verify an email address
///
/// # Endpoint
///
/// ```text
/// GET /auth/verify-email/:token
/// ```
///
/// The token is single use: it is cleared as the address is marked verified.
///
/// # Errors
///
/// - `400 Bad Request`: no account holds this token
pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let invalid = || ApiError::BadRequest("Invalid or expired verification token".to_string());

    if !verification::is_well_formed(&token) {
        return Err(invalid());
    }

    let digest = verification::hash_verification_token(&token);
    let user = User::verify_email(&state.db, &digest)
        .await?
        .ok_or_else(invalid)?;

    tracing::info!(user_id = user.id, "Email verified");

    Ok(Json(MessageResponse::new("Email verified successfully")))
}

/// Current user profile
///
/// # Errors
///
/// - `404 Not Found`: the account was deleted after the token was issued
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<MeResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse { user }))
}

fn issue_token(state: &AppState, user: &User) -> ApiResult<String> {
    let claims = Claims::new(user.id, &user.email, user.role, state.config.jwt.expires_in);
    Ok(jwt::create_token(&claims, state.jwt_secret())?)
}
