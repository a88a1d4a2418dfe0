/// Event endpoints
///
/// # Endpoints
///
/// - `GET /events` - List events with participants and organizers (public)
/// - `GET /events/:id` - Get one event (public)
/// - `POST /events` - Create event (ADMIN, ORGANIZER)
/// - `PUT /events/:id` - Update event (ADMIN, ORGANIZER)
/// - `DELETE /events/:id` - Delete event (ADMIN)
/// - `POST /events/:eventId/participants/:participantId` - Add participant (ADMIN, ORGANIZER)
/// - `DELETE /events/:eventId/participants/:participantId` - Remove participant (ADMIN, ORGANIZER)
///
/// `participantIds` and `organizerIds` are added to the existing links on
/// create and replace them on update.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::validation::{validate_iso_date, validate_time_of_day, ValidatedJson},
    routes::{parse_id, MessageResponse},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use eventhub_shared::models::{
    event::{parse_event_date, CreateEvent, Event, EventDetails, UpdateEvent},
    participant::Participant,
    relation::EVENT_PARTICIPANTS,
    user::User,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create and update request
///
/// Update takes the same full body as create.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct EventRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// `YYYY-MM-DD` or RFC 3339
    #[validate(custom(function = "validate_iso_date", message = "Please provide a valid date"))]
    pub date: String,

    #[validate(custom(function = "validate_time_of_day", message = "Start time must be in format HH:MM"))]
    pub start_time: String,

    #[validate(custom(function = "validate_time_of_day", message = "End time must be in format HH:MM"))]
    pub end_time: String,

    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    pub participant_ids: Option<Vec<i32>>,
    pub organizer_ids: Option<Vec<i32>>,
}

impl EventRequest {
    fn parsed_date(&self) -> ApiResult<chrono::DateTime<chrono::Utc>> {
        parse_event_date(&self.date)
            .ok_or_else(|| ApiError::validation("date", "Please provide a valid date"))
    }
}

/// Event list response
#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<EventDetails>,
}

/// Single event response
#[derive(Debug, Serialize)]
pub struct EventResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub event: EventDetails,
}

/// List all events
///
/// # Endpoint
///
/// ```text
/// GET /events
/// ```
///
/// # Response
///
/// ```json
/// {
///   "events": [{
///     "id": 1,
///     "title": "Anniversaire 2025",
///     "date": "2025-06-25T00:00:00Z",
///     "startTime": "19:00",
///     "participants": [{ "id": 3, "status": "CONFIRMED", "user": { "id": 7, "email": "..." } }],
///     "organizers": []
///   }]
/// }
/// ```
pub async fn list_events(State(state): State<AppState>) -> ApiResult<Json<EventsResponse>> {
    let events = Event::list_details(&state.db).await?;

    Ok(Json(EventsResponse { events }))
}

/// Get one event with participants and organizers
///
/// # Errors
///
/// - `400 Bad Request`: malformed id
/// - `404 Not Found`: no such event
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<EventResponse>> {
    let id = parse_id(&id, "event")?;

    let event = Event::find_details(&state.db, id)
        .await?
        .ok_or_else(event_not_found)?;

    Ok(Json(EventResponse {
        message: None,
        event,
    }))
}

/// Create an event
///
/// # Endpoint
///
/// ```text
/// POST /events
/// Authorization: Bearer <token>
///
/// {
///   "title": "Anniversaire 2025",
///   "description": "Soirée d'anniversaire",
///   "date": "2025-06-25",
///   "startTime": "19:00",
///   "endTime": "23:00",
///   "location": "Salle des fêtes",
///   "address": "1 rue de la Paix, Paris",
///   "organizerIds": [1]
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, or a linked id does not exist
pub async fn create_event(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<EventRequest>,
) -> ApiResult<(StatusCode, Json<EventResponse>)> {
    let date = req.parsed_date()?;

    let event = Event::create(
        &state.db,
        CreateEvent {
            title: req.title,
            description: req.description,
            date,
            start_time: req.start_time,
            end_time: req.end_time,
            location: req.location,
            address: req.address,
            participant_ids: req.participant_ids.unwrap_or_default(),
            organizer_ids: req.organizer_ids.unwrap_or_default(),
        },
    )
    .await?;

    tracing::info!(event_id = event.id, "Event created");

    let event = Event::find_details(&state.db, event.id)
        .await?
        .ok_or_else(event_not_found)?;

    Ok((
        StatusCode::CREATED,
        Json(EventResponse {
            message: Some("Event created successfully".to_string()),
            event,
        }),
    ))
}

/// Update an event
///
/// # Errors
///
/// - `400 Bad Request`: malformed id, validation failed, or a linked id does not exist
/// - `404 Not Found`: no such event (nothing is written)
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<EventRequest>,
) -> ApiResult<Json<EventResponse>> {
    let id = parse_id(&id, "event")?;

    if Event::find_by_id(&state.db, id).await?.is_none() {
        return Err(event_not_found());
    }

    let date = req.parsed_date()?;
    let update = UpdateEvent {
        title: Some(req.title),
        description: Some(req.description),
        date: Some(date),
        start_time: Some(req.start_time),
        end_time: Some(req.end_time),
        location: Some(req.location),
        address: Some(req.address),
        participant_ids: req.participant_ids,
        organizer_ids: req.organizer_ids,
    };

    Event::update(&state.db, id, update)
        .await?
        .ok_or_else(event_not_found)?;

    let event = Event::find_details(&state.db, id)
        .await?
        .ok_or_else(event_not_found)?;

    Ok(Json(EventResponse {
        message: Some("Event updated successfully".to_string()),
        event,
    }))
}

/// Delete an event
///
/// Participant and organizer links go with it; the profiles stay.
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, "event")?;

    if Event::find_by_id(&state.db, id).await?.is_none() {
        return Err(event_not_found());
    }

    Event::delete(&state.db, id).await?;

    tracing::info!(event_id = id, "Event deleted");

    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

/// Add a participant to an event
///
/// Idempotent: adding an existing link succeeds without change. The
/// participant's user is sent a registration confirmation; a mail failure is
/// logged and does not fail the request.
///
/// # Errors
///
/// - `404 Not Found`: no such event or participant
pub async fn add_participant(
    State(state): State<AppState>,
    Path((event_id, participant_id)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    let (event, participant) = load_pair(&state, &event_id, &participant_id).await?;

    let mut conn = state.db.acquire().await?;
    let linked = EVENT_PARTICIPANTS
        .connect(&mut *conn, event.id, participant.id)
        .await?;
    drop(conn);

    tracing::info!(
        event_id = event.id,
        participant_id = participant.id,
        new_link = linked,
        "Participant added to event"
    );

    notify_registration(&state, &event, &participant).await;

    Ok(Json(MessageResponse::new(
        "Participant added to event successfully",
    )))
}

/// Remove a participant from an event
///
/// # Errors
///
/// - `404 Not Found`: no such event or participant
pub async fn remove_participant(
    State(state): State<AppState>,
    Path((event_id, participant_id)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    let (event, participant) = load_pair(&state, &event_id, &participant_id).await?;

    let mut conn = state.db.acquire().await?;
    EVENT_PARTICIPANTS
        .disconnect(&mut *conn, event.id, participant.id)
        .await?;

    tracing::info!(
        event_id = event.id,
        participant_id = participant.id,
        "Participant removed from event"
    );

    Ok(Json(MessageResponse::new(
        "Participant removed from event successfully",
    )))
}

async fn load_pair(
    state: &AppState,
    event_id: &str,
    participant_id: &str,
) -> ApiResult<(Event, Participant)> {
    let event_id = parse_id(event_id, "event")?;
    let participant_id = parse_id(participant_id, "participant")?;

    let event = Event::find_by_id(&state.db, event_id)
        .await?
        .ok_or_else(event_not_found)?;

    let participant = Participant::find_by_id(&state.db, participant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Participant not found".to_string()))?;

    Ok((event, participant))
}

async fn notify_registration(state: &AppState, event: &Event, participant: &Participant) {
    let user = match User::find_by_id(&state.db, participant.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return,
        Err(err) => {
            tracing::warn!(error = %err, "Could not load participant user for registration email");
            return;
        }
    };

    if let Err(err) = state
        .mailer
        .send_event_registration_email(&user.email, &user.first_name, &event.title, event.date)
        .await
    {
        tracing::warn!(
            event_id = event.id,
            user_id = user.id,
            error = %err,
            "Failed to send registration email"
        );
    }
}

fn event_not_found() -> ApiError {
    ApiError::NotFound("Event not found".to_string())
}
