/// Organizer model and database operations
///
/// An organizer is the staff profile of exactly one user. Creating one
/// promotes the user to `ORGANIZER`; deleting it demotes the user to `USER`.
/// Each pair of writes shares a transaction, so the role and the profile never
/// disagree after a failure.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organizers (
///     id SERIAL PRIMARY KEY,
///     user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
///     phone VARCHAR(32),
///     position VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use eventhub_shared::models::organizer::{CreateOrganizer, Organizer};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let organizer = Organizer::create(&pool, CreateOrganizer {
///     user_id: 2,
///     position: Some("Coordinator".to_string()),
///     ..Default::default()
/// }).await?;
///
/// // user 2 is now an ORGANIZER; deleting demotes them again
/// Organizer::delete(&pool, organizer.id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use super::event::{group_by_key, Event};
use super::relation::EVENT_ORGANIZERS;
use super::user::{Role, User, UserSummary, USER_SUMMARY_COLUMNS};

/// Organizer row
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Organizer {
    pub id: i32,
    pub user_id: i32,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Organizer with its user summary
#[derive(Debug, Clone, Serialize)]
pub struct OrganizerWithUser {
    #[serde(flatten)]
    pub organizer: Organizer,
    pub user: UserSummary,
}

/// Organizer with its user summary and linked events
#[derive(Debug, Clone, Serialize)]
pub struct OrganizerDetails {
    #[serde(flatten)]
    pub organizer: Organizer,
    pub user: UserSummary,
    pub events: Vec<Event>,
}

/// Input for creating an organizer
#[derive(Debug, Clone, Default)]
pub struct CreateOrganizer {
    pub user_id: i32,
    pub phone: Option<String>,
    pub position: Option<String>,

    /// Events to connect after insert
    pub event_ids: Vec<i32>,
}

/// Input for updating an organizer
///
/// `Some(event_ids)` replaces every event link.
#[derive(Debug, Clone, Default)]
pub struct UpdateOrganizer {
    pub phone: Option<String>,
    pub position: Option<String>,
    pub event_ids: Option<Vec<i32>>,
}

#[derive(sqlx::FromRow)]
struct OrganizerUserRow {
    #[sqlx(flatten)]
    organizer: Organizer,
    user_email: String,
    user_first_name: String,
    user_last_name: String,
    user_role: Role,
}

impl From<OrganizerUserRow> for OrganizerWithUser {
    fn from(row: OrganizerUserRow) -> Self {
        let user = UserSummary {
            id: row.organizer.user_id,
            email: row.user_email,
            first_name: row.user_first_name,
            last_name: row.user_last_name,
            role: row.user_role,
        };

        Self {
            organizer: row.organizer,
            user,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LinkedOrganizerRow {
    event_id: i32,
    #[sqlx(flatten)]
    row: OrganizerUserRow,
}

const ORGANIZER_COLUMNS: &str = "o.id, o.user_id, o.phone, o.position, o.created_at, o.updated_at";

impl Organizer {
    /// Promotes a user to organizer
    ///
    /// In one transaction: sets the user's role to `ORGANIZER`, inserts the
    /// organizer row and connects `event_ids`.
    ///
    /// # Errors
    ///
    /// - `sqlx::Error::RowNotFound` if the user does not exist
    /// - a database error if the user already has an organizer row or an
    ///   event id is unknown
    pub async fn create(pool: &PgPool, data: CreateOrganizer) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !User::set_role(&mut *tx, data.user_id, Role::Organizer).await? {
            return Err(sqlx::Error::RowNotFound);
        }

        let organizer = sqlx::query_as::<_, Organizer>(
            r#"
            INSERT INTO organizers (user_id, phone, position)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, phone, position, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.phone)
        .bind(data.position)
        .fetch_one(&mut *tx)
        .await?;

        EVENT_ORGANIZERS
            .connect_events(&mut tx, organizer.id, &data.event_ids)
            .await?;

        tx.commit().await?;

        tracing::info!(
            organizer_id = organizer.id,
            user_id = organizer.user_id,
            "User promoted to organizer"
        );

        Ok(organizer)
    }

    /// Finds an organizer by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {ORGANIZER_COLUMNS} FROM organizers o WHERE o.id = $1");

        sqlx::query_as::<_, Organizer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds the organizer wrapping a user, if any
    pub async fn find_by_user_id(pool: &PgPool, user_id: i32) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {ORGANIZER_COLUMNS} FROM organizers o WHERE o.user_id = $1");

        sqlx::query_as::<_, Organizer>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Lists every organizer with user summary and events
    pub async fn list_details(pool: &PgPool) -> Result<Vec<OrganizerDetails>, sqlx::Error> {
        let query = format!(
            "SELECT {ORGANIZER_COLUMNS}, {USER_SUMMARY_COLUMNS} \
             FROM organizers o JOIN users u ON u.id = o.user_id \
             ORDER BY o.id"
        );

        let rows = sqlx::query_as::<_, OrganizerUserRow>(&query)
            .fetch_all(pool)
            .await?;

        Self::attach_events(pool, rows.into_iter().map(Into::into).collect()).await
    }

    /// Finds one organizer with user summary and events
    pub async fn find_details(pool: &PgPool, id: i32) -> Result<Option<OrganizerDetails>, sqlx::Error> {
        let query = format!(
            "SELECT {ORGANIZER_COLUMNS}, {USER_SUMMARY_COLUMNS} \
             FROM organizers o JOIN users u ON u.id = o.user_id \
             WHERE o.id = $1"
        );

        let Some(row) = sqlx::query_as::<_, OrganizerUserRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let mut details = Self::attach_events(pool, vec![row.into()]).await?;
        Ok(details.pop())
    }

    async fn attach_events(
        pool: &PgPool,
        organizers: Vec<OrganizerWithUser>,
    ) -> Result<Vec<OrganizerDetails>, sqlx::Error> {
        let ids: Vec<i32> = organizers.iter().map(|o| o.organizer.id).collect();
        let mut events = group_by_key(Event::linked_to(pool, EVENT_ORGANIZERS, &ids).await?);

        Ok(organizers
            .into_iter()
            .map(|OrganizerWithUser { organizer, user }| OrganizerDetails {
                events: events.remove(&organizer.id).unwrap_or_default(),
                organizer,
                user,
            })
            .collect())
    }

    /// Updates an organizer
    ///
    /// Omitted fields stay unchanged; `event_ids` replaces every link in the
    /// same transaction. Returns `None` if the organizer does not exist.
    pub async fn update(
        pool: &PgPool,
        id: i32,
        data: UpdateOrganizer,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let organizer = sqlx::query_as::<_, Organizer>(
            r#"
            UPDATE organizers SET
                phone = COALESCE($2, phone),
                position = COALESCE($3, position),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, phone, position, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.phone)
        .bind(data.position)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(organizer) = organizer else {
            return Ok(None);
        };

        if let Some(event_ids) = &data.event_ids {
            EVENT_ORGANIZERS
                .set_events(&mut tx, organizer.id, event_ids)
                .await?;
        }

        tx.commit().await?;

        Ok(Some(organizer))
    }

    /// Deletes an organizer and demotes its user to `USER`
    ///
    /// Both writes share a transaction. Event links cascade. Returns false if
    /// the organizer does not exist.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user_id = sqlx::query_scalar::<_, i32>(
            "DELETE FROM organizers WHERE id = $1 RETURNING user_id",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user_id) = user_id else {
            return Ok(false);
        };

        User::set_role(&mut *tx, user_id, Role::User).await?;

        tx.commit().await?;

        tracing::info!(organizer_id = id, user_id, "Organizer removed, user demoted");

        Ok(true)
    }

    /// Loads the organizers (with users) of a batch of events
    ///
    /// Returns `(event_id, organizer)` pairs.
    pub async fn linked_to_events(
        pool: &PgPool,
        event_ids: &[i32],
    ) -> Result<Vec<(i32, OrganizerWithUser)>, sqlx::Error> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT eo.event_id, {ORGANIZER_COLUMNS}, {USER_SUMMARY_COLUMNS} \
             FROM event_organizers eo \
             JOIN organizers o ON o.id = eo.organizer_id \
             JOIN users u ON u.id = o.user_id \
             WHERE eo.event_id = ANY($1) \
             ORDER BY o.id"
        );

        let rows = sqlx::query_as::<_, LinkedOrganizerRow>(&query)
            .bind(event_ids)
            .fetch_all(pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.event_id, r.row.into()))
            .collect())
    }
}
