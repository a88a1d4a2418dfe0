/// Database layer for EventHub
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: embedded migration runner for the workspace `migrations/` directory
/// - `seed`: idempotent bootstrap data (admin account, sample event)
///
/// Models live in the crate-level `models` module.
///
/// # Example
///
/// ```no_run
/// use eventhub_shared::db::pool::{create_pool, DatabaseConfig};
/// use eventhub_shared::db::migrations::run_migrations;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     })
///     .await?;
///
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
pub mod seed;
