/// Organizer endpoints
///
/// # Endpoints
///
/// - `GET /organizers` - List organizers (authenticated)
/// - `GET /organizers/:id` - Get one organizer (authenticated)
/// - `POST /organizers` - Promote a user to organizer (ADMIN)
/// - `PUT /organizers/:id` - Update organizer (ADMIN)
/// - `DELETE /organizers/:id` - Remove organizer, demoting the user (ADMIN)
/// - `POST /organizers/:organizerId/events/:eventId` - Link organizer to event (ADMIN)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::validation::{validate_phone, ValidatedJson},
    routes::{parse_id, MessageResponse},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use eventhub_shared::models::{
    event::Event,
    organizer::{CreateOrganizer, Organizer, OrganizerDetails, UpdateOrganizer},
    relation::EVENT_ORGANIZERS,
    user::User,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create organizer request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizerRequest {
    #[validate(required(message = "User ID must be an integer"))]
    pub user_id: Option<i32>,

    #[validate(custom(function = "validate_phone", message = "Please provide a valid phone number"))]
    pub phone: Option<String>,

    #[validate(length(min = 1, message = "Position cannot be empty if provided"))]
    pub position: Option<String>,

    /// Events to link (added to existing links)
    pub event_ids: Option<Vec<i32>>,
}

/// Update organizer request
///
/// The owning user cannot change, so there is no `userId`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizerRequest {
    #[validate(custom(function = "validate_phone", message = "Please provide a valid phone number"))]
    pub phone: Option<String>,

    #[validate(length(min = 1, message = "Position cannot be empty if provided"))]
    pub position: Option<String>,

    /// Replaces every event link when present
    pub event_ids: Option<Vec<i32>>,
}

/// Organizer list response
#[derive(Debug, Serialize)]
pub struct OrganizersResponse {
    pub organizers: Vec<OrganizerDetails>,
}

/// Single organizer response
#[derive(Debug, Serialize)]
pub struct OrganizerResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub organizer: OrganizerDetails,
}

/// List all organizers with their users and events
pub async fn list_organizers(
    State(state): State<AppState>,
) -> ApiResult<Json<OrganizersResponse>> {
    let organizers = Organizer::list_details(&state.db).await?;

    Ok(Json(OrganizersResponse { organizers }))
}

/// Get one organizer
///
/// # Errors
///
/// - `404 Not Found`: no such organizer
pub async fn get_organizer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OrganizerResponse>> {
    let id = parse_id(&id, "organizer")?;

    let organizer = Organizer::find_details(&state.db, id)
        .await?
        .ok_or_else(organizer_not_found)?;

    Ok(Json(OrganizerResponse {
        message: None,
        organizer,
    }))
}

/// Promote a user to organizer
///
/// # Endpoint
///
/// ```text
/// POST /organizers
/// Authorization: Bearer <admin token>
///
/// { "userId": 2, "phone": "+33612345678", "position": "Coordinator", "eventIds": [1] }
/// ```
///
/// The user's role becomes `ORGANIZER` in the same transaction as the insert.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, the user already has an organizer
///   profile, or an event id does not exist
/// - `404 Not Found`: no such user
pub async fn create_organizer(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateOrganizerRequest>,
) -> ApiResult<(StatusCode, Json<OrganizerResponse>)> {
    let user_id = req
        .user_id
        .ok_or_else(|| ApiError::validation("userId", "User ID must be an integer"))?;

    if !User::exists(&state.db, user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    if Organizer::find_by_user_id(&state.db, user_id).await?.is_some() {
        return Err(ApiError::Conflict(
            "Organizer already exists for this user".to_string(),
        ));
    }

    let organizer = Organizer::create(
        &state.db,
        CreateOrganizer {
            user_id,
            phone: req.phone,
            position: req.position,
            event_ids: req.event_ids.unwrap_or_default(),
        },
    )
    .await?;

    let organizer = Organizer::find_details(&state.db, organizer.id)
        .await?
        .ok_or_else(organizer_not_found)?;

    Ok((
        StatusCode::CREATED,
        Json(OrganizerResponse {
            message: Some("Organizer created successfully".to_string()),
            organizer,
        }),
    ))
}

/// Update an organizer
///
/// Omitted fields stay unchanged; `eventIds` replaces every link.
///
/// # Errors
///
/// - `404 Not Found`: no such organizer (nothing is written)
pub async fn update_organizer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateOrganizerRequest>,
) -> ApiResult<Json<OrganizerResponse>> {
    let id = parse_id(&id, "organizer")?;

    if Organizer::find_by_id(&state.db, id).await?.is_none() {
        return Err(organizer_not_found());
    }

    Organizer::update(
        &state.db,
        id,
        UpdateOrganizer {
            phone: req.phone,
            position: req.position,
            event_ids: req.event_ids,
        },
    )
    .await?
    .ok_or_else(organizer_not_found)?;

    let organizer = Organizer::find_details(&state.db, id)
        .await?
        .ok_or_else(organizer_not_found)?;

    Ok(Json(OrganizerResponse {
        message: Some("Organizer updated successfully".to_string()),
        organizer,
    }))
}

/// Remove an organizer
///
/// The user's role goes back to `USER` in the same transaction.
pub async fn delete_organizer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, "organizer")?;

    if !Organizer::delete(&state.db, id).await? {
        return Err(organizer_not_found());
    }

    Ok(Json(MessageResponse::new("Organizer deleted successfully")))
}

/// Link an organizer to an event
///
/// Idempotent.
///
/// # Errors
///
/// - `404 Not Found`: no such event or organizer
pub async fn add_to_event(
    State(state): State<AppState>,
    Path((organizer_id, event_id)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    let organizer_id = parse_id(&organizer_id, "organizer")?;
    let event_id = parse_id(&event_id, "event")?;

    if Event::find_by_id(&state.db, event_id).await?.is_none() {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }

    if Organizer::find_by_id(&state.db, organizer_id).await?.is_none() {
        return Err(organizer_not_found());
    }

    let mut conn = state.db.acquire().await?;
    EVENT_ORGANIZERS
        .connect(&mut *conn, event_id, organizer_id)
        .await?;

    tracing::info!(event_id, organizer_id, "Organizer added to event");

    Ok(Json(MessageResponse::new("Organizer added to event successfully")))
}

fn organizer_not_found() -> ApiError {
    ApiError::NotFound("Organizer not found".to_string())
}
