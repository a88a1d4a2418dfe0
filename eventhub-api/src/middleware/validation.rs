/// Request body validation
///
/// [`ValidatedJson`] deserializes a JSON body and runs its `validator` rules
/// before the handler sees it. A failure short-circuits with:
///
/// ```json
/// { "message": "Validation failed", "errors": [{ "field": "startTime", "message": "Start time must be in format HH:MM" }] }
/// ```
///
/// The `validate_*` functions are the custom predicates referenced by the
/// request DTOs through `#[validate(custom(function = "..."))]`.

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use eventhub_shared::models::{event::parse_event_date, participant::ParticipantStatus};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

/// JSON body that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation("body", rejection.body_text()))?;

        value.validate()?;

        Ok(Self(value))
    }
}

/// Clock time `H:MM` or `HH:MM`, 00:00 through 23:59
pub fn validate_time_of_day(value: &str) -> Result<(), ValidationError> {
    let valid = value.split_once(':').is_some_and(|(hours, minutes)| {
        let hours_ok = (1..=2).contains(&hours.len())
            && hours.bytes().all(|b| b.is_ascii_digit())
            && hours.parse::<u8>().is_ok_and(|h| h <= 23);
        let minutes_ok = minutes.len() == 2
            && minutes.bytes().all(|b| b.is_ascii_digit())
            && minutes.as_bytes()[0] <= b'5';

        hours_ok && minutes_ok
    });

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("time_of_day"))
    }
}

/// ISO-8601 calendar date or RFC-3339 timestamp
pub fn validate_iso_date(value: &str) -> Result<(), ValidationError> {
    match parse_event_date(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("iso_date")),
    }
}

/// Phone number: optional leading `+`, 7 to 15 digits, spaces and dashes allowed
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let rest = value.strip_prefix('+').unwrap_or(value);
    let shape_ok = !rest.is_empty()
        && rest.starts_with(|c: char| c.is_ascii_digit())
        && rest.ends_with(|c: char| c.is_ascii_digit())
        && rest
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');
    let digits = rest.chars().filter(char::is_ascii_digit).count();

    if shape_ok && (7..=15).contains(&digits) {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

/// One of `PENDING`, `CONFIRMED`, `DECLINED`
pub fn validate_participant_status(value: &str) -> Result<(), ValidationError> {
    if ParticipantStatus::ALL.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("participant_status"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header};
    use serde::Deserialize;

    #[test]
    fn test_time_of_day() {
        for ok in ["00:00", "9:30", "09:30", "19:59", "23:59"] {
            assert!(validate_time_of_day(ok).is_ok(), "{ok}");
        }
        for bad in ["24:00", "25:00", "12:60", "12:5", "123:00", "ab:cd", "1200", "", "-1:00"] {
            assert!(validate_time_of_day(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_iso_date() {
        assert!(validate_iso_date("2025-06-25").is_ok());
        assert!(validate_iso_date("2025-06-25T18:00:00Z").is_ok());
        assert!(validate_iso_date("2025-06-25T18:00:00+02:00").is_ok());
        assert!(validate_iso_date("2025-06-25T19:00:00.000Z").is_ok());
        assert!(validate_iso_date("2025-06-25T19:00:00").is_ok());
        assert!(validate_iso_date("2025-06-25T19:00").is_ok());
        assert!(validate_iso_date("25/06/2025").is_err());
        assert!(validate_iso_date("2025-13-01").is_err());
        assert!(validate_iso_date("tomorrow").is_err());
    }

    #[test]
    fn test_phone() {
        for ok in ["+33612345678", "0612345678", "+1 555-123-4567", "5551234"] {
            assert!(validate_phone(ok).is_ok(), "{ok}");
        }
        for bad in ["12345", "+", "phone", "555-", "+1234567890123456", "06 12 34 ab"] {
            assert!(validate_phone(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_participant_status() {
        assert!(validate_participant_status("PENDING").is_ok());
        assert!(validate_participant_status("CONFIRMED").is_ok());
        assert!(validate_participant_status("DECLINED").is_ok());
        assert!(validate_participant_status("pending").is_err());
        assert!(validate_participant_status("MAYBE").is_err());
    }

    #[derive(Debug, Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    struct Slot {
        #[validate(custom(function = "validate_time_of_day", message = "Start time must be in format HH:MM"))]
        start_time: String,
    }

    async fn extract(body: &'static str) -> Result<ValidatedJson<Slot>, ApiError> {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();

        ValidatedJson::<Slot>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_extractor_accepts_valid_body() {
        let ValidatedJson(slot) = extract(r#"{"startTime":"18:30"}"#).await.unwrap();
        assert_eq!(slot.start_time, "18:30");
    }

    #[tokio::test]
    async fn test_extractor_reports_field_errors() {
        let err = extract(r#"{"startTime":"25:00"}"#).await.unwrap_err();

        match err {
            ApiError::ValidationError(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "startTime");
                assert_eq!(errors[0].message, "Start time must be in format HH:MM");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_extractor_rejects_malformed_json() {
        let err = extract("{not json").await.unwrap_err();

        match err {
            ApiError::ValidationError(errors) => assert_eq!(errors[0].field, "body"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
