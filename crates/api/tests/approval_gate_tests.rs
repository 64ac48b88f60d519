mod common;

use axum::http::StatusCode;
use infra::models::{EventStatus, Role};
use serde_json::json;

use common::*;

#[tokio::test]
async fn organizer_submission_starts_pending_with_full_seat_pool() {
    let state = setup_state();
    let app = build_app(&state);
    let (_, token) = create_test_user(&state, "organizer@test.com", Role::Organizer).await;

    let (status, body) = send_request(
        &app,
        "POST",
        "/api/events",
        Some(&token),
        Some(json!({
            "title": "Rust Meetup",
            "description": "Talks and pizza",
            "location": "Main Hall",
            "eventDate": next_week().to_rfc3339(),
            "totalSeats": 40
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "submit should succeed: {body}");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["totalSeats"], 40);
    assert_eq!(body["availableSeats"], 40);
}

#[tokio::test]
async fn attendees_cannot_submit_events() {
    let state = setup_state();
    let app = build_app(&state);
    let (_, token) = create_test_user(&state, "attendee@test.com", Role::User).await;

    let (status, body) = send_request(
        &app,
        "POST",
        "/api/events",
        Some(&token),
        Some(json!({
            "title": "Nope",
            "location": "Nowhere",
            "eventDate": next_week().to_rfc3339(),
            "totalSeats": 5
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn non_positive_seat_counts_are_rejected() {
    let state = setup_state();
    let app = build_app(&state);
    let (_, token) = create_test_user(&state, "organizer2@test.com", Role::Organizer).await;

    let (status, body) = send_request(
        &app,
        "POST",
        "/api/events",
        Some(&token),
        Some(json!({
            "title": "Empty Venue",
            "location": "Hall",
            "eventDate": next_week().to_rfc3339(),
            "totalSeats": 0
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn admin_review_approves_and_is_terminal() {
    let state = setup_state();
    let app = build_app(&state);
    let (organizer, _) = create_test_user(&state, "org3@test.com", Role::Organizer).await;
    let (_, admin_token) = create_test_user(&state, "admin3@test.com", Role::Admin).await;
    let event_id =
        create_test_event(&state, organizer.id, 10, EventStatus::Pending, next_week()).await;

    let (status, body) = send_request(
        &app,
        "PUT",
        &format!("/api/admin/events/{event_id}"),
        Some(&admin_token),
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "review should succeed: {body}");
    assert_eq!(body["status"], "approved");

    // The decision is final; a second review fails.
    let (status, body) = send_request(
        &app,
        "PUT",
        &format!("/api/admin/events/{event_id}"),
        Some(&admin_token),
        Some(json!({ "status": "rejected" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn only_admins_may_review() {
    let state = setup_state();
    let app = build_app(&state);
    let (organizer, organizer_token) =
        create_test_user(&state, "org4@test.com", Role::Organizer).await;
    let event_id =
        create_test_event(&state, organizer.id, 10, EventStatus::Pending, next_week()).await;

    let (status, _) = send_request(
        &app,
        "PUT",
        &format!("/api/admin/events/{event_id}"),
        Some(&organizer_token),
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reviewing_a_missing_event_is_not_found() {
    let state = setup_state();
    let app = build_app(&state);
    let (_, admin_token) = create_test_user(&state, "admin5@test.com", Role::Admin).await;

    let (status, _) = send_request(
        &app,
        "PUT",
        &format!("/api/admin/events/{}", uuid::Uuid::new_v4()),
        Some(&admin_token),
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn public_listing_contains_only_approved_events() {
    let state = setup_state();
    let app = build_app(&state);
    let (organizer, _) = create_test_user(&state, "org6@test.com", Role::Organizer).await;

    create_test_event(&state, organizer.id, 5, EventStatus::Pending, next_week()).await;
    create_test_event(&state, organizer.id, 5, EventStatus::Rejected, next_week()).await;
    let approved_id =
        create_test_event(&state, organizer.id, 5, EventStatus::Approved, next_week()).await;

    let (status, body) = send_request(&app, "GET", "/api/events", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let events = body.as_array().expect("listing should be an array");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], approved_id.to_string());
}

#[tokio::test]
async fn undecided_events_are_visible_only_to_their_organizer_and_admins() {
    let state = setup_state();
    let app = build_app(&state);
    let (organizer, organizer_token) =
        create_test_user(&state, "org7@test.com", Role::Organizer).await;
    let (_, admin_token) = create_test_user(&state, "admin7@test.com", Role::Admin).await;
    let (_, stranger_token) = create_test_user(&state, "user7@test.com", Role::User).await;
    let event_id =
        create_test_event(&state, organizer.id, 5, EventStatus::Pending, next_week()).await;
    let uri = format!("/api/events/{event_id}");

    let (status, _) = send_request(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "anonymous sees nothing");

    let (status, _) = send_request(&app, "GET", &uri, Some(&stranger_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "other users see nothing");

    let (status, _) = send_request(&app, "GET", &uri, Some(&organizer_token), None).await;
    assert_eq!(status, StatusCode::OK, "the owner sees the event");

    let (status, _) = send_request(&app, "GET", &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK, "admins see the event");
}

#[tokio::test]
async fn organizer_listing_shows_own_events_in_every_status() {
    let state = setup_state();
    let app = build_app(&state);
    let (organizer, organizer_token) =
        create_test_user(&state, "org8@test.com", Role::Organizer).await;
    let (other, _) = create_test_user(&state, "org8b@test.com", Role::Organizer).await;

    create_test_event(&state, organizer.id, 5, EventStatus::Pending, next_week()).await;
    create_test_event(&state, organizer.id, 5, EventStatus::Rejected, next_week()).await;
    create_test_event(&state, other.id, 5, EventStatus::Approved, next_week()).await;

    let (status, body) = send_request(
        &app,
        "GET",
        "/api/events/organizer/my-events",
        Some(&organizer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array").len(), 2);
}
