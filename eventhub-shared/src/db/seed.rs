/// Bootstrap data
///
/// Creates the first ADMIN account (nobody else can create organizers) and
/// one sample event. Safe to run repeatedly: an existing admin email is left
/// untouched and the sample event is only added to an empty `events` table.
///
/// # Example
///
/// ```no_run
/// use eventhub_shared::db::seed::{seed, SeedConfig};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let report = seed(&pool, &SeedConfig::default()).await?;
/// println!("admin id {}", report.admin_id);
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use tracing::info;

use crate::auth::password::{hash_password, PasswordError};
use crate::models::event::{parse_event_date, CreateEvent, Event};
use crate::models::user::Role;

/// Admin credentials used by the seed
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_email: "admin@example.com".to_string(),
            admin_password: "admin123".to_string(),
        }
    }
}

/// What the seed run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_id: i32,
    pub admin_created: bool,
    pub sample_event_id: Option<i32>,
}

/// Error type for seeding
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to hash admin password: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid sample data: {0}")]
    InvalidData(String),
}

/// Inserts the admin account and sample event if missing
///
/// # Errors
///
/// Returns an error if hashing or any query fails
pub async fn seed(pool: &PgPool, config: &SeedConfig) -> Result<SeedReport, SeedError> {
    let password_hash = hash_password(&config.admin_password)?;

    let inserted: Option<i32> = sqlx::query_scalar(
        r#"
        INSERT INTO users (email, password_hash, first_name, last_name, role, is_email_verified)
        VALUES ($1, $2, 'Admin', 'User', $3, TRUE)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(&config.admin_email)
    .bind(&password_hash)
    .bind(Role::Admin)
    .fetch_optional(pool)
    .await?;

    let (admin_id, admin_created) = match inserted {
        Some(id) => (id, true),
        None => {
            let id = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
                .bind(&config.admin_email)
                .fetch_one(pool)
                .await?;
            (id, false)
        }
    };
    info!(admin_id, admin_created, email = %config.admin_email, "Admin account seeded");

    let event_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
        .fetch_one(pool)
        .await?;

    let sample_event_id = if event_count == 0 {
        let event = Event::create(pool, sample_event()?).await?;
        info!(event_id = event.id, title = %event.title, "Sample event created");
        Some(event.id)
    } else {
        None
    };

    Ok(SeedReport {
        admin_id,
        admin_created,
        sample_event_id,
    })
}

fn sample_event() -> Result<CreateEvent, SeedError> {
    let date = parse_event_date("2025-06-25")
        .ok_or_else(|| SeedError::InvalidData("sample event date".to_string()))?;

    Ok(CreateEvent {
        title: "Anniversaire 2025".to_string(),
        description: "Une soirée exceptionnelle pour célébrer ensemble. Venez nombreux pour \
                      partager ce moment de joie et de convivialité."
            .to_string(),
        date,
        start_time: "19:00".to_string(),
        end_time: "02:00".to_string(),
        location: "Salle des Fêtes".to_string(),
        address: "123 Avenue des Célébrations, Paris".to_string(),
        participant_ids: Vec::new(),
        organizer_ids: Vec::new(),
    })
}
