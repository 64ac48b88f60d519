use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use api::auth::{AuthConfig, Claims};
use api::AppState;
use infra::models::{EventStatus, Role, UserRow};
use infra::store::{NewEvent, NewUser};
use infra::MemStore;

pub fn setup_state() -> AppState {
    let config = AuthConfig {
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expiration_hours: 1,
    };
    AppState::with_config(Arc::new(MemStore::new()), config)
}

pub fn build_app(state: &AppState) -> Router {
    api::app::build_router(state.clone())
}

/// Seed a user directly through the store and mint a bearer token for it.
#[allow(dead_code)]
pub async fn create_test_user(state: &AppState, email: &str, role: Role) -> (UserRow, String) {
    let user = state
        .store()
        .insert_user(NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: "$2b$12$dummy.hash.for.testing".to_string(),
            role,
        })
        .await
        .expect("failed to create test user");

    let token = state
        .jwt_service()
        .create_token(&user)
        .expect("failed to mint test token");

    (user, token)
}

/// Claims for driving service functions directly, bypassing HTTP.
#[allow(dead_code)]
pub fn claims_for(user: &UserRow) -> Claims {
    Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        iat: Utc::now().timestamp(),
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
    }
}

#[allow(dead_code)]
pub fn next_week() -> DateTime<Utc> {
    Utc::now() + Duration::days(7)
}

/// Seed an event; decides it away from `pending` when asked.
#[allow(dead_code)]
pub async fn create_test_event(
    state: &AppState,
    organizer_id: Uuid,
    total_seats: i32,
    status: EventStatus,
    event_date: DateTime<Utc>,
) -> Uuid {
    let event = state
        .store()
        .insert_event(NewEvent {
            organizer_id,
            title: "Test Event".to_string(),
            description: Some("Test event description".to_string()),
            location: "Test Hall".to_string(),
            event_date,
            total_seats,
        })
        .await
        .expect("failed to create test event");

    if status != EventStatus::Pending {
        state
            .store()
            .decide_event(event.id, status)
            .await
            .expect("failed to decide test event")
            .expect("test event was not pending");
    }

    event.id
}

/// Fire one request at the router and decode the JSON body (if any).
#[allow(dead_code)]
pub async fn send_request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("failed to build request"),
        None => builder.body(Body::empty()).expect("failed to build request"),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
