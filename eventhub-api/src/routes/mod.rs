/// API route handlers
///
/// Handlers are grouped by resource:
///
/// - `health`: service and database health
/// - `auth`: registration, login, email verification, current user
/// - `events`: events and their participant links
/// - `organizers`: organizer profiles and their event links
/// - `participants`: participant profiles
///
/// Path ids arrive as strings and go through [`parse_id`], so a malformed id
/// is a 400 rather than a routing miss.

pub mod auth;
pub mod events;
pub mod health;
pub mod organizers;
pub mod participants;

use crate::error::{ApiError, ApiResult};
use serde::Serialize;

/// Body of responses that carry only a message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Parses an integer path id
///
/// # Errors
///
/// `400 "Invalid <name> id"` if `raw` is not an integer
pub fn parse_id(raw: &str, name: &str) -> ApiResult<i32> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {} id", name)))
}
