//! # EventHub Seed
//!
//! Creates the database if needed, applies migrations, then upserts the
//! ADMIN account and a sample event. Safe to run repeatedly.
//!
//! ## Usage
//!
//! ```bash
//! SEED_ADMIN_EMAIL=admin@example.com SEED_ADMIN_PASSWORD=admin123 \
//!     cargo run -p eventhub-api --bin eventhub-seed
//! ```

use anyhow::Context;
use eventhub_shared::db::{
    migrations::{ensure_database_exists, run_migrations},
    pool::{self, DatabaseConfig},
    seed::{seed, SeedConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventhub_shared=info,eventhub_seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let defaults = SeedConfig::default();
    let config = SeedConfig {
        admin_email: std::env::var("SEED_ADMIN_EMAIL").unwrap_or(defaults.admin_email),
        admin_password: std::env::var("SEED_ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
    };

    ensure_database_exists(&url).await?;

    let db = pool::create_pool(DatabaseConfig {
        url,
        max_connections: 2,
        ..DatabaseConfig::default()
    })
    .await?;
    run_migrations(&db).await?;

    let report = seed(&db, &config).await?;

    tracing::info!(
        admin_id = report.admin_id,
        admin_created = report.admin_created,
        sample_event_id = ?report.sample_event_id,
        "Seeding complete"
    );

    pool::close_pool(db).await;

    Ok(())
}
