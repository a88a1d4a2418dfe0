/// Event model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE events (
///     id SERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     date TIMESTAMPTZ NOT NULL,
///     start_time VARCHAR(5) NOT NULL,
///     end_time VARCHAR(5) NOT NULL,
///     location VARCHAR(255) NOT NULL,
///     address VARCHAR(512) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `start_time` and `end_time` are stored exactly as submitted (`HH:MM`);
/// only `date` is a timestamp.
///
/// # Example
///
/// ```no_run
/// use eventhub_shared::models::event::{parse_event_date, CreateEvent, Event};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let event = Event::create(&pool, CreateEvent {
///     title: "Launch".to_string(),
///     description: "Product launch".to_string(),
///     date: parse_event_date("2025-06-25").ok_or("bad date")?,
///     start_time: "19:00".to_string(),
///     end_time: "23:00".to_string(),
///     location: "Main hall".to_string(),
///     address: "1 Example Street".to_string(),
///     participant_ids: vec![],
///     organizer_ids: vec![1],
/// }).await?;
///
/// let details = Event::find_details(&pool, event.id).await?;
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use super::organizer::{Organizer, OrganizerWithUser};
use super::participant::{Participant, ParticipantWithUser};
use super::relation::{Relation, EVENT_ORGANIZERS, EVENT_PARTICIPANTS};

/// Event row
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event with its participants and organizers, each carrying a user summary
#[derive(Debug, Clone, Serialize)]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: Event,
    pub participants: Vec<ParticipantWithUser>,
    pub organizers: Vec<OrganizerWithUser>,
}

/// Input for creating an event
///
/// `participant_ids` and `organizer_ids` are connected (added) after insert.
#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub address: String,
    pub participant_ids: Vec<i32>,
    pub organizer_ids: Vec<i32>,
}

/// Input for updating an event
///
/// `None` leaves a field unchanged. `Some` on a relation list replaces all
/// links of that kind.
#[derive(Debug, Clone, Default)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub participant_ids: Option<Vec<i32>>,
    pub organizer_ids: Option<Vec<i32>>,
}

/// Parses an event date
///
/// Accepts a calendar date (`2025-06-25`, stored as midnight UTC), a full
/// RFC 3339 timestamp (`2025-06-25T19:00:00+02:00`), or a local datetime
/// without offset (`2025-06-25T19:00:00`, `2025-06-25T19:00`) read as UTC.
pub fn parse_event_date(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|dt| dt.and_utc())
}

const EVENT_COLUMNS: &str = "e.id, e.title, e.description, e.date, e.start_time, e.end_time, \
                             e.location, e.address, e.created_at, e.updated_at";

#[derive(sqlx::FromRow)]
struct LinkedEventRow {
    member_id: i32,
    #[sqlx(flatten)]
    event: Event,
}

impl Event {
    /// Creates an event and connects the given participants and organizers
    ///
    /// Runs in one transaction; an unknown participant or organizer id fails
    /// the foreign key check and nothing is written.
    pub async fn create(pool: &PgPool, data: CreateEvent) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, description, date, start_time, end_time, location, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, date, start_time, end_time,
                      location, address, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.date)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.location)
        .bind(data.address)
        .fetch_one(&mut *tx)
        .await?;

        EVENT_PARTICIPANTS
            .connect_members(&mut tx, event.id, &data.participant_ids)
            .await?;
        EVENT_ORGANIZERS
            .connect_members(&mut tx, event.id, &data.organizer_ids)
            .await?;

        tx.commit().await?;

        Ok(event)
    }

    /// Finds an event by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events e WHERE e.id = $1");

        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists every event, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events e ORDER BY e.id");

        sqlx::query_as::<_, Event>(&query).fetch_all(pool).await
    }

    /// Lists every event with participants and organizers
    pub async fn list_details(pool: &PgPool) -> Result<Vec<EventDetails>, sqlx::Error> {
        let events = Self::list(pool).await?;
        EventDetails::load(pool, events).await
    }

    /// Finds one event with participants and organizers
    pub async fn find_details(pool: &PgPool, id: i32) -> Result<Option<EventDetails>, sqlx::Error> {
        let Some(event) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let mut details = EventDetails::load(pool, vec![event]).await?;
        Ok(details.pop())
    }

    /// Updates an event
    ///
    /// Scalar fields use "omitted means unchanged". Relation lists, when
    /// present, replace the existing links in the same transaction.
    /// Returns `None` if the event does not exist.
    pub async fn update(
        pool: &PgPool,
        id: i32,
        data: UpdateEvent,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                start_time = COALESCE($5, start_time),
                end_time = COALESCE($6, end_time),
                location = COALESCE($7, location),
                address = COALESCE($8, address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, date, start_time, end_time,
                      location, address, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.date)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.location)
        .bind(data.address)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(event) = event else {
            return Ok(None);
        };

        if let Some(participant_ids) = &data.participant_ids {
            EVENT_PARTICIPANTS
                .set_members(&mut tx, event.id, participant_ids)
                .await?;
        }
        if let Some(organizer_ids) = &data.organizer_ids {
            EVENT_ORGANIZERS
                .set_members(&mut tx, event.id, organizer_ids)
                .await?;
        }

        tx.commit().await?;

        Ok(Some(event))
    }

    /// Deletes an event; its links cascade, linked profiles stay
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Loads the events linked to each member through `relation`
    ///
    /// Returns `(member_id, event)` pairs ordered by event id.
    pub async fn linked_to(
        pool: &PgPool,
        relation: Relation,
        member_ids: &[i32],
    ) -> Result<Vec<(i32, Self)>, sqlx::Error> {
        if member_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT l.{member} AS member_id, {EVENT_COLUMNS} \
             FROM {table} l JOIN events e ON e.id = l.event_id \
             WHERE l.{member} = ANY($1) \
             ORDER BY e.id",
            member = relation.member_column(),
            table = relation.table(),
        );

        let rows = sqlx::query_as::<_, LinkedEventRow>(&query)
            .bind(member_ids)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(|r| (r.member_id, r.event)).collect())
    }
}

impl EventDetails {
    /// Attaches participants and organizers to a batch of events
    ///
    /// Two queries regardless of batch size.
    pub async fn load(pool: &PgPool, events: Vec<Event>) -> Result<Vec<Self>, sqlx::Error> {
        let ids: Vec<i32> = events.iter().map(|e| e.id).collect();

        let mut participants = group_by_key(Participant::linked_to_events(pool, &ids).await?);
        let mut organizers = group_by_key(Organizer::linked_to_events(pool, &ids).await?);

        Ok(events
            .into_iter()
            .map(|event| EventDetails {
                participants: participants.remove(&event.id).unwrap_or_default(),
                organizers: organizers.remove(&event.id).unwrap_or_default(),
                event,
            })
            .collect())
    }
}

/// Groups `(key, value)` pairs into a map of vectors, keeping order
pub(crate) fn group_by_key<T>(pairs: Vec<(i32, T)>) -> HashMap<i32, Vec<T>> {
    let mut grouped: HashMap<i32, Vec<T>> = HashMap::new();
    for (key, value) in pairs {
        grouped.entry(key).or_default().push(value);
    }
    grouped
}
