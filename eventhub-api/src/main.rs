//! # EventHub API Server
//!
//! REST backend for events, their organizers and their participants, with
//! JWT authentication and ADMIN / ORGANIZER / USER roles.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (`.env` honoured)
//! 2. Open the database pool and apply pending migrations
//! 3. Build the mailer (SMTP, or log-only when `EMAIL_HOST` is unset)
//! 4. Serve until Ctrl-C, then close the pool
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p eventhub-api
//! ```

use eventhub_api::{
    app::{build_router, AppState},
    config::Config,
};
use eventhub_shared::{
    db::{migrations::run_migrations, pool},
    mail::build_mailer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "eventhub_api=debug,eventhub_shared=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "EventHub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(config.database.pool_config()).await?;
    run_migrations(&db).await?;

    let mailer = build_mailer(&config.mail)?;

    let address = config.bind_address();
    let state = AppState::new(db.clone(), config, mailer);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, closing database pool");
    pool::close_pool(db).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
}
