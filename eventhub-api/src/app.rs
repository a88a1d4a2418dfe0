/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use eventhub_api::{app::AppState, config::Config};
/// use eventhub_shared::{db::pool::create_pool, mail::build_mailer};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.database.pool_config()).await?;
/// let mailer = build_mailer(&config.mail)?;
/// let state = AppState::new(pool, config, mailer);
/// let app = eventhub_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{
        auth::{authenticate, authorize, require_verified},
        errors::ErrorDetailLayer,
    },
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use eventhub_shared::{auth::authorization::RoleSet, mail::Mailer};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through Axum's `State` extractor; all fields are
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Outgoing mail
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            mailer,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health
/// ├── /auth/
/// │   ├── POST /register                          public
/// │   ├── POST /login                             public
/// │   ├── GET  /verify-email/:token               public
/// │   └── GET  /me                                authenticated
/// ├── /events/
/// │   ├── GET    /, /:id                          public
/// │   ├── POST   /, PUT /:id                      ADMIN, ORGANIZER
/// │   ├── DELETE /:id                             ADMIN
/// │   └── POST, DELETE /:eventId/participants/:participantId
/// │                                               ADMIN, ORGANIZER
/// ├── /organizers/
/// │   ├── GET    /, /:id                          authenticated
/// │   ├── POST   /, PUT /:id, DELETE /:id         ADMIN
/// │   └── POST   /:organizerId/events/:eventId    ADMIN
/// └── /participants/
///     ├── GET    /                                ADMIN, ORGANIZER
///     ├── GET    /:id, PUT /:id                   authenticated, staff or owner
///     ├── POST   /                                authenticated (+ verified email if required)
///     └── DELETE /:id                             ADMIN, ORGANIZER
/// ```
///
/// # Middleware Stack
///
/// Per route group, outermost first: authenticate, authorize, require
/// verified email. Body validation runs in the `ValidatedJson` extractor.
///
/// Global layers, outermost first:
/// 1. Error detail exposure (non-production only)
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes::{auth, events, health, organizers, participants};

    let authn = || from_fn_with_state(state.clone(), authenticate);

    let health_routes = Router::new().route("/health", get(health::health_check));

    // Auth
    let auth_public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/verify-email/:token", get(auth::verify_email));

    let auth_private = Router::new()
        .route("/auth/me", get(auth::me))
        .route_layer(authn());

    // Events
    let event_public = Router::new()
        .route("/events", get(events::list_events))
        .route("/events/:id", get(events::get_event));

    let event_staff = Router::new()
        .route("/events", post(events::create_event))
        .route("/events/:id", put(events::update_event))
        .route(
            "/events/:id/participants/:participant_id",
            post(events::add_participant).delete(events::remove_participant),
        )
        .route_layer(from_fn_with_state(RoleSet::STAFF, authorize))
        .route_layer(authn());

    let event_admin = Router::new()
        .route("/events/:id", delete(events::delete_event))
        .route_layer(from_fn_with_state(RoleSet::ADMIN, authorize))
        .route_layer(authn());

    // Organizers
    let organizer_read = Router::new()
        .route("/organizers", get(organizers::list_organizers))
        .route("/organizers/:id", get(organizers::get_organizer))
        .route_layer(authn());

    let organizer_admin = Router::new()
        .route("/organizers", post(organizers::create_organizer))
        .route(
            "/organizers/:id",
            put(organizers::update_organizer).delete(organizers::delete_organizer),
        )
        .route(
            "/organizers/:id/events/:event_id",
            post(organizers::add_to_event),
        )
        .route_layer(from_fn_with_state(RoleSet::ADMIN, authorize))
        .route_layer(authn());

    // Participants
    let participant_staff = Router::new()
        .route("/participants", get(participants::list_participants))
        .route(
            "/participants/:id",
            delete(participants::delete_participant),
        )
        .route_layer(from_fn_with_state(RoleSet::STAFF, authorize))
        .route_layer(authn());

    let participant_owner = Router::new()
        .route(
            "/participants/:id",
            get(participants::get_participant).put(participants::update_participant),
        )
        .route_layer(authn());

    let participant_register = Router::new()
        .route("/participants", post(participants::create_participant))
        .route_layer(from_fn_with_state(state.clone(), require_verified))
        .route_layer(authn());

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let expose_detail = state.config.api.environment.exposes_error_detail();

    Router::new()
        .merge(health_routes)
        .merge(auth_public)
        .merge(auth_private)
        .merge(event_public)
        .merge(event_staff)
        .merge(event_admin)
        .merge(organizer_read)
        .merge(organizer_admin)
        .merge(participant_staff)
        .merge(participant_owner)
        .merge(participant_register)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(ErrorDetailLayer::new(expose_detail))
        .with_state(state)
}
