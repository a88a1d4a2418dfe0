/// Authentication and authorization layers
///
/// Route groups stack these with `route_layer`, outermost first:
///
/// ```text
/// authenticate → authorize(RoleSet) → require_verified → handler
/// ```
///
/// [`authenticate`] decodes the bearer token and stores an [`AuthContext`] in
/// request extensions; the later layers and the handlers read it from there.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware::from_fn_with_state, routing::delete, Router};
/// use eventhub_api::app::AppState;
/// use eventhub_api::middleware::auth::{authenticate, authorize};
/// use eventhub_shared::auth::authorization::RoleSet;
///
/// # fn example(state: AppState) -> Router<AppState> {
/// # async fn handler() {}
/// Router::new()
///     .route("/events/:id", delete(handler))
///     .route_layer(from_fn_with_state(RoleSet::ADMIN, authorize))
///     .route_layer(from_fn_with_state(state, authenticate))
/// # }
/// ```

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use eventhub_shared::auth::{
    authorization::{self, RoleSet},
    middleware::{authenticate_headers, AuthContext},
};

/// Requires a valid bearer token
///
/// # Errors
///
/// - `401 "Not authorized, no token"`: no `Authorization: Bearer` header
/// - `401 "Not authorized, token failed"`: bad signature, expired or wrong issuer
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = authenticate_headers(req.headers(), state.jwt_secret())?;

    tracing::debug!(user_id = auth.user_id, role = %auth.role, "Request authenticated");

    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}

/// Requires the authenticated role to be in `allowed`
///
/// # Errors
///
/// - `401`: [`authenticate`] did not run first
/// - `403 "Not authorized to access this resource"`: role not allowed
pub async fn authorize(
    State(allowed): State<RoleSet>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = current_auth(&req)?.clone();

    if let Err(err) = authorization::require_role(&auth, allowed) {
        tracing::warn!(user_id = auth.user_id, error = %err, "Role check failed");
        return Err(err.into());
    }

    Ok(next.run(req).await)
}

/// Requires a verified email address when `REQUIRE_VERIFIED_EMAIL` is set
///
/// Reads the user row on every request.
///
/// # Errors
///
/// - `403 "Please verify your email first"`
/// - `404 "User not found"`: the user was deleted after the token was issued
pub async fn require_verified(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.config.require_verified_email {
        let auth = current_auth(&req)?.clone();
        authorization::require_verified(&state.db, &auth).await?;
    }

    Ok(next.run(req).await)
}

fn current_auth(req: &Request) -> Result<&AuthContext, ApiError> {
    req.extensions()
        .get::<AuthContext>()
        .ok_or_else(|| ApiError::Unauthorized("Not authorized, no token".to_string()))
}
