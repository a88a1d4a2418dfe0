/// Database models for EventHub
///
/// # Models
///
/// - `user`: accounts, roles and email verification state
/// - `event`: events plus batch loading of their participants and organizers
/// - `organizer`: staff profiles; creating or deleting one changes the user's role
/// - `participant`: attendee profiles with RSVP status
/// - `relation`: connect / disconnect / set operations on the event join tables
///
/// Every model exposes async associated functions over a `PgPool`; operations
/// that write more than one table open their own transaction.
///
/// # Example
///
/// ```no_run
/// use eventhub_shared::models::event::Event;
/// use eventhub_shared::models::participant::{CreateParticipant, Participant};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let participant = Participant::create(&pool, CreateParticipant {
///     user_id: 3,
///     event_ids: vec![1],
///     ..Default::default()
/// }).await?;
///
/// let events = Event::list_details(&pool).await?;
/// # Ok(())
/// # }
/// ```

pub mod event;
pub mod organizer;
pub mod participant;
pub mod relation;
pub mod user;
