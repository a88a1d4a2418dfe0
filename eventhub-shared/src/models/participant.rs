/// Participant model and database operations
///
/// A participant is the attendee profile of exactly one user. It links to any
/// number of events through `event_participants`.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE participant_status AS ENUM ('PENDING', 'CONFIRMED', 'DECLINED');
///
/// CREATE TABLE participants (
///     id SERIAL PRIMARY KEY,
///     user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
///     phone VARCHAR(32),
///     status participant_status NOT NULL DEFAULT 'PENDING',
///     notes TEXT,
///     guests INTEGER NOT NULL DEFAULT 0 CHECK (guests >= 0),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::event::Event;
use super::relation::EVENT_PARTICIPANTS;
use super::user::{Role, UserSummary, USER_SUMMARY_COLUMNS};

/// Attendance status; any transition is allowed
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "participant_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ParticipantStatus {
    #[default]
    Pending,
    Confirmed,
    Declined,
}

impl ParticipantStatus {
    /// Every accepted spelling, in declaration order
    pub const ALL: [&'static str; 3] = ["PENDING", "CONFIRMED", "DECLINED"];
}

impl std::str::FromStr for ParticipantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ParticipantStatus::Pending),
            "CONFIRMED" => Ok(ParticipantStatus::Confirmed),
            "DECLINED" => Ok(ParticipantStatus::Declined),
            _ => Err(format!("Invalid participant status: {}", s)),
        }
    }
}

/// Participant row
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: i32,
    pub user_id: i32,
    pub phone: Option<String>,
    pub status: ParticipantStatus,
    pub notes: Option<String>,
    pub guests: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Participant with its user summary
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantWithUser {
    #[serde(flatten)]
    pub participant: Participant,
    pub user: UserSummary,
}

/// Participant with its user summary and linked events
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantDetails {
    #[serde(flatten)]
    pub participant: Participant,
    pub user: UserSummary,
    pub events: Vec<Event>,
}

/// Input for creating a participant
#[derive(Debug, Clone, Default)]
pub struct CreateParticipant {
    pub user_id: i32,
    pub phone: Option<String>,
    pub status: Option<ParticipantStatus>,
    pub notes: Option<String>,
    pub guests: Option<i32>,

    /// Events to connect after insert
    pub event_ids: Vec<i32>,
}

/// Input for updating a participant
///
/// The owning user cannot change. `Some(event_ids)` replaces every link.
#[derive(Debug, Clone, Default)]
pub struct UpdateParticipant {
    pub phone: Option<String>,
    pub status: Option<ParticipantStatus>,
    pub notes: Option<String>,
    pub guests: Option<i32>,
    pub event_ids: Option<Vec<i32>>,
}

/// Participant joined with its user's public columns
#[derive(sqlx::FromRow)]
struct ParticipantUserRow {
    #[sqlx(flatten)]
    participant: Participant,
    user_email: String,
    user_first_name: String,
    user_last_name: String,
    user_role: Role,
}

impl From<ParticipantUserRow> for ParticipantWithUser {
    fn from(row: ParticipantUserRow) -> Self {
        let user = UserSummary {
            id: row.participant.user_id,
            email: row.user_email,
            first_name: row.user_first_name,
            last_name: row.user_last_name,
            role: row.user_role,
        };

        Self {
            participant: row.participant,
            user,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LinkedParticipantRow {
    event_id: i32,
    #[sqlx(flatten)]
    row: ParticipantUserRow,
}

const PARTICIPANT_COLUMNS: &str = "p.id, p.user_id, p.phone, p.status, p.notes, p.guests, \
                                   p.created_at, p.updated_at";

impl Participant {
    /// Creates a participant and connects the given events
    ///
    /// The insert and the event links share one transaction.
    ///
    /// # Errors
    ///
    /// Returns a database error if the user already has a participant
    /// (unique violation), an event id is unknown (foreign key violation) or
    /// `guests` is negative (check violation)
    pub async fn create(pool: &PgPool, data: CreateParticipant) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let participant = sqlx::query_as::<_, Participant>(
            r#"
            INSERT INTO participants (user_id, phone, status, notes, guests)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, phone, status, notes, guests, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.phone)
        .bind(data.status.unwrap_or_default())
        .bind(data.notes)
        .bind(data.guests.unwrap_or(0))
        .fetch_one(&mut *tx)
        .await?;

        EVENT_PARTICIPANTS
            .connect_events(&mut tx, participant.id, &data.event_ids)
            .await?;

        tx.commit().await?;

        Ok(participant)
    }

    /// Finds a participant by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {PARTICIPANT_COLUMNS} FROM participants p WHERE p.id = $1");

        sqlx::query_as::<_, Participant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds the participant wrapping a user, if any
    pub async fn find_by_user_id(pool: &PgPool, user_id: i32) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {PARTICIPANT_COLUMNS} FROM participants p WHERE p.user_id = $1");

        sqlx::query_as::<_, Participant>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Lists every participant with its user summary
    pub async fn list_with_users(pool: &PgPool) -> Result<Vec<ParticipantWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {PARTICIPANT_COLUMNS}, {USER_SUMMARY_COLUMNS} \
             FROM participants p JOIN users u ON u.id = p.user_id \
             ORDER BY p.id"
        );

        let rows = sqlx::query_as::<_, ParticipantUserRow>(&query)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Finds one participant with its user summary and events
    pub async fn find_details(
        pool: &PgPool,
        id: i32,
    ) -> Result<Option<ParticipantDetails>, sqlx::Error> {
        let query = format!(
            "SELECT {PARTICIPANT_COLUMNS}, {USER_SUMMARY_COLUMNS} \
             FROM participants p JOIN users u ON u.id = p.user_id \
             WHERE p.id = $1"
        );

        let Some(row) = sqlx::query_as::<_, ParticipantUserRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let ParticipantWithUser { participant, user } = row.into();
        let events = Event::linked_to(pool, EVENT_PARTICIPANTS, &[participant.id])
            .await?
            .into_iter()
            .map(|(_, event)| event)
            .collect();

        Ok(Some(ParticipantDetails {
            participant,
            user,
            events,
        }))
    }

    /// Updates a participant
    ///
    /// Omitted fields stay unchanged; `event_ids` replaces every link in the
    /// same transaction. Returns `None` if the participant does not exist.
    pub async fn update(
        pool: &PgPool,
        id: i32,
        data: UpdateParticipant,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let participant = sqlx::query_as::<_, Participant>(
            r#"
            UPDATE participants SET
                phone = COALESCE($2, phone),
                status = COALESCE($3, status),
                notes = COALESCE($4, notes),
                guests = COALESCE($5, guests),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, phone, status, notes, guests, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.phone)
        .bind(data.status)
        .bind(data.notes)
        .bind(data.guests)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(participant) = participant else {
            return Ok(None);
        };

        if let Some(event_ids) = &data.event_ids {
            EVENT_PARTICIPANTS
                .set_events(&mut tx, participant.id, event_ids)
                .await?;
        }

        tx.commit().await?;

        Ok(Some(participant))
    }

    /// Deletes a participant; its event links cascade
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM participants WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Loads the participants (with users) of a batch of events
    ///
    /// Returns `(event_id, participant)` pairs.
    pub async fn linked_to_events(
        pool: &PgPool,
        event_ids: &[i32],
    ) -> Result<Vec<(i32, ParticipantWithUser)>, sqlx::Error> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT ep.event_id, {PARTICIPANT_COLUMNS}, {USER_SUMMARY_COLUMNS} \
             FROM event_participants ep \
             JOIN participants p ON p.id = ep.participant_id \
             JOIN users u ON u.id = p.user_id \
             WHERE ep.event_id = ANY($1) \
             ORDER BY p.id"
        );

        let rows = sqlx::query_as::<_, LinkedParticipantRow>(&query)
            .bind(event_ids)
            .fetch_all(pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.event_id, r.row.into()))
            .collect())
    }
}
