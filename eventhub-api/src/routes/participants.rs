/// Participant endpoints
///
/// # Endpoints
///
/// - `GET /participants` - List participants (ADMIN, ORGANIZER)
/// - `GET /participants/:id` - Get one participant (staff or owner)
/// - `POST /participants` - Register a participant (staff, or a user for themselves)
/// - `PUT /participants/:id` - Update participant (staff or owner)
/// - `DELETE /participants/:id` - Delete participant (ADMIN, ORGANIZER)
///
/// "Owner" is the user the participant profile wraps.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::validation::{validate_participant_status, validate_phone, ValidatedJson},
    routes::{parse_id, MessageResponse},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use eventhub_shared::{
    auth::{authorization::require_ownership, middleware::AuthContext},
    models::{
        participant::{
            CreateParticipant, Participant, ParticipantDetails, ParticipantStatus,
            ParticipantWithUser, UpdateParticipant,
        },
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create participant request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateParticipantRequest {
    #[validate(required(message = "User ID must be an integer"))]
    pub user_id: Option<i32>,

    #[validate(custom(function = "validate_phone", message = "Please provide a valid phone number"))]
    pub phone: Option<String>,

    /// `PENDING` (default), `CONFIRMED` or `DECLINED`
    #[validate(custom(function = "validate_participant_status", message = "Invalid status"))]
    pub status: Option<String>,

    pub notes: Option<String>,

    #[validate(range(min = 0, message = "Guests must be a positive integer"))]
    pub guests: Option<i32>,

    /// Events to link (added to existing links)
    pub event_ids: Option<Vec<i32>>,
}

/// Update participant request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParticipantRequest {
    #[validate(custom(function = "validate_phone", message = "Please provide a valid phone number"))]
    pub phone: Option<String>,

    #[validate(custom(function = "validate_participant_status", message = "Invalid status"))]
    pub status: Option<String>,

    pub notes: Option<String>,

    #[validate(range(min = 0, message = "Guests must be a positive integer"))]
    pub guests: Option<i32>,

    /// Replaces every event link when present
    pub event_ids: Option<Vec<i32>>,
}

/// Participant list response
#[derive(Debug, Serialize)]
pub struct ParticipantsResponse {
    pub participants: Vec<ParticipantWithUser>,
}

/// Single participant response
#[derive(Debug, Serialize)]
pub struct ParticipantResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub participant: ParticipantDetails,
}

/// List all participants with their users
pub async fn list_participants(
    State(state): State<AppState>,
) -> ApiResult<Json<ParticipantsResponse>> {
    let participants = Participant::list_with_users(&state.db).await?;

    Ok(Json(ParticipantsResponse { participants }))
}

/// Get one participant with user and events
///
/// # Errors
///
/// - `403 Forbidden`: a USER asking for someone else's profile
/// - `404 Not Found`: no such participant
pub async fn get_participant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<ParticipantResponse>> {
    let id = parse_id(&id, "participant")?;

    let participant = Participant::find_details(&state.db, id)
        .await?
        .ok_or_else(participant_not_found)?;

    require_ownership(&auth, participant.participant.user_id)?;

    Ok(Json(ParticipantResponse {
        message: None,
        participant,
    }))
}

/// Register a participant
///
/// # Endpoint
///
/// ```text
/// POST /participants
/// Authorization: Bearer <token>
///
/// { "userId": 7, "status": "CONFIRMED", "guests": 2, "eventIds": [1] }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, the user is already registered,
///   or an event id does not exist
/// - `403 Forbidden`: a USER registering someone else
/// - `404 Not Found`: no such user
pub async fn create_participant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateParticipantRequest>,
) -> ApiResult<(StatusCode, Json<ParticipantResponse>)> {
    let user_id = req
        .user_id
        .ok_or_else(|| ApiError::validation("userId", "User ID must be an integer"))?;

    require_ownership(&auth, user_id)?;

    if !User::exists(&state.db, user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    if Participant::find_by_user_id(&state.db, user_id).await?.is_some() {
        return Err(ApiError::Conflict(
            "Participant already exists for this user".to_string(),
        ));
    }

    let participant = Participant::create(
        &state.db,
        CreateParticipant {
            user_id,
            phone: req.phone,
            status: parse_status(req.status.as_deref())?,
            notes: req.notes,
            guests: req.guests,
            event_ids: req.event_ids.unwrap_or_default(),
        },
    )
    .await?;

    tracing::info!(participant_id = participant.id, user_id, "Participant registered");

    let participant = Participant::find_details(&state.db, participant.id)
        .await?
        .ok_or_else(participant_not_found)?;

    Ok((
        StatusCode::CREATED,
        Json(ParticipantResponse {
            message: Some("Participant created successfully".to_string()),
            participant,
        }),
    ))
}

/// Update a participant
///
/// Omitted fields stay unchanged; `eventIds` replaces every link. Any status
/// may move to any other.
///
/// # Errors
///
/// - `403 Forbidden`: a USER updating someone else's profile
/// - `404 Not Found`: no such participant (nothing is written)
pub async fn update_participant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateParticipantRequest>,
) -> ApiResult<Json<ParticipantResponse>> {
    let id = parse_id(&id, "participant")?;

    let existing = Participant::find_by_id(&state.db, id)
        .await?
        .ok_or_else(participant_not_found)?;

    require_ownership(&auth, existing.user_id)?;

    Participant::update(
        &state.db,
        id,
        UpdateParticipant {
            phone: req.phone,
            status: parse_status(req.status.as_deref())?,
            notes: req.notes,
            guests: req.guests,
            event_ids: req.event_ids,
        },
    )
    .await?
    .ok_or_else(participant_not_found)?;

    let participant = Participant::find_details(&state.db, id)
        .await?
        .ok_or_else(participant_not_found)?;

    Ok(Json(ParticipantResponse {
        message: Some("Participant updated successfully".to_string()),
        participant,
    }))
}

/// Delete a participant
///
/// Event links go with it; the user stays.
pub async fn delete_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, "participant")?;

    if Participant::find_by_id(&state.db, id).await?.is_none() {
        return Err(participant_not_found());
    }

    Participant::delete(&state.db, id).await?;

    tracing::info!(participant_id = id, "Participant deleted");

    Ok(Json(MessageResponse::new("Participant deleted successfully")))
}

fn parse_status(raw: Option<&str>) -> ApiResult<Option<ParticipantStatus>> {
    raw.map(|s| {
        s.parse::<ParticipantStatus>()
            .map_err(|_| ApiError::validation("status", "Invalid status"))
    })
    .transpose()
}

fn participant_not_found() -> ApiError {
    ApiError::NotFound("Participant not found".to_string())
}
