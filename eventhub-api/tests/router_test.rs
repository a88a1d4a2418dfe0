/// Router tests that never reach the database
///
/// The app runs over a lazily connected pool pointed at the test URL. Every
/// request here is rejected (or answered) by the middleware chain, the body
/// extractor or id parsing before any query runs, so these pass without a
/// PostgreSQL server.

mod common;

use axum::http::{Method, StatusCode};
use common::{lazy_app, send, token_for};
use eventhub_shared::models::user::Role;
use serde_json::json;

#[tokio::test]
async fn test_write_routes_require_token() {
    let app = lazy_app(&[]);

    let cases = [
        (Method::POST, "/events"),
        (Method::PUT, "/events/1"),
        (Method::DELETE, "/events/1"),
        (Method::POST, "/events/1/participants/2"),
        (Method::DELETE, "/events/1/participants/2"),
        (Method::POST, "/organizers"),
        (Method::GET, "/organizers"),
        (Method::POST, "/organizers/1/events/2"),
        (Method::GET, "/participants"),
        (Method::POST, "/participants"),
        (Method::GET, "/participants/1"),
        (Method::GET, "/auth/me"),
    ];

    for (method, uri) in cases {
        let (status, body) = send(&app, method.clone(), uri, None, Some(json!({}))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["message"], "Not authorized, no token", "{method} {uri}");
    }
}

#[tokio::test]
async fn test_bad_token_rejected() {
    let app = lazy_app(&[]);

    let (status, body) = send(&app, Method::GET, "/auth/me", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized, token failed");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_rejected() {
    use chrono::Duration;
    use eventhub_shared::auth::jwt::{create_token, Claims};

    let app = lazy_app(&[]);
    let claims = Claims::new(1, "a@example.com", Role::Admin, Duration::hours(1));
    let token = create_token(&claims, "another-secret-that-is-32-bytes-long!!").unwrap();

    let (status, _) = send(&app, Method::GET, "/organizers", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_disallowed_roles_forbidden() {
    let app = lazy_app(&[]);
    let user = token_for(10, Role::User);
    let organizer = token_for(11, Role::Organizer);

    let cases = [
        (Method::POST, "/events", &user),
        (Method::DELETE, "/events/1", &organizer),
        (Method::POST, "/events/1/participants/2", &user),
        (Method::POST, "/organizers", &organizer),
        (Method::DELETE, "/organizers/1", &organizer),
        (Method::POST, "/organizers/1/events/2", &organizer),
        (Method::GET, "/participants", &user),
        (Method::DELETE, "/participants/1", &user),
    ];

    for (method, uri, token) in cases {
        let (status, body) = send(&app, method.clone(), uri, Some(token), Some(json!({}))).await;

        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(
            body["message"], "Not authorized to access this resource",
            "{method} {uri}"
        );
    }
}

#[tokio::test]
async fn test_event_validation_runs_before_persistence() {
    let app = lazy_app(&[]);
    let token = token_for(11, Role::Organizer);

    let body = json!({
        "title": "Late show",
        "description": "Too late",
        "date": "2025-06-25",
        "startTime": "25:00",
        "endTime": "23:00",
        "location": "Hall",
        "address": "1 Main Street"
    });

    let (status, body) = send(&app, Method::POST, "/events", Some(&token), Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"][0]["field"], "startTime");
    assert_eq!(body["errors"][0]["message"], "Start time must be in format HH:MM");
}

#[tokio::test]
async fn test_event_validation_lists_every_field() {
    let app = lazy_app(&[]);
    let token = token_for(1, Role::Admin);

    let (status, body) = send(&app, Method::POST, "/events", Some(&token), Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        ["address", "date", "description", "endTime", "location", "startTime", "title"]
    );
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = lazy_app(&[]);

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"email\":"))
        .unwrap();

    use tower::Service as _;
    let response = app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_validation() {
    let app = lazy_app(&[]);

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "nope", "password": "123", "firstName": "", "lastName": "X" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().any(|e| e["message"] == "Please provide a valid email"));
    assert!(errors.iter().any(|e| e["message"] == "Password must be at least 6 characters"));
    assert!(errors.iter().any(|e| e["field"] == "firstName"));
}

#[tokio::test]
async fn test_invalid_path_ids() {
    let app = lazy_app(&[]);
    let admin = token_for(1, Role::Admin);

    let (status, body) = send(&app, Method::GET, "/events/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid event id");

    let (status, body) = send(&app, Method::DELETE, "/organizers/x1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid organizer id");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/participants/one",
        Some(&admin),
        Some(json!({ "guests": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid participant id");
}

#[tokio::test]
async fn test_participant_validation_for_plain_user() {
    let app = lazy_app(&[]);
    let token = token_for(12, Role::User);

    let (status, body) = send(
        &app,
        Method::POST,
        "/participants",
        Some(&token),
        Some(json!({ "userId": 12, "status": "MAYBE", "guests": -2 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let messages: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, ["Guests must be a positive integer", "Invalid status"]);
}

#[tokio::test]
async fn test_user_cannot_register_someone_else() {
    let app = lazy_app(&[]);
    let token = token_for(12, Role::User);

    let (status, body) = send(
        &app,
        Method::POST,
        "/participants",
        Some(&token),
        Some(json!({ "userId": 13 })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized to access this resource");
}

#[tokio::test]
async fn test_malformed_verification_token() {
    let app = lazy_app(&[]);

    let (status, body) = send(&app, Method::GET, "/auth/verify-email/short", None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired verification token");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = lazy_app(&[]);

    let (status, _) = send(&app, Method::GET, "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
