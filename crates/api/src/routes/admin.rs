use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use infra::models::EventStatus;
use infra::pagination::LimitOffset;

use crate::auth::{require_role, Claims};
use crate::error::AppError;
use crate::services::bookings::{self, BookingDetailResponse};
use crate::services::events::{self, EventResponse};
use crate::services::UserResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/:event_id", put(review_event))
        .route("/bookings", get(list_bookings))
        .route("/users", get(list_users))
}

async fn list_events(
    State(state): State<AppState>,
    claims: Claims,
    Query(page): Query<LimitOffset>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    Ok(Json(events::list_all_events(&state, &claims, page).await?))
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub status: EventStatus,
}

async fn review_event(
    State(state): State<AppState>,
    claims: Claims,
    Path(event_id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<EventResponse>, AppError> {
    Ok(Json(
        events::review_event(&state, &claims, event_id, req.status).await?,
    ))
}

async fn list_bookings(
    State(state): State<AppState>,
    claims: Claims,
    Query(page): Query<LimitOffset>,
) -> Result<Json<Vec<BookingDetailResponse>>, AppError> {
    Ok(Json(
        bookings::list_all_bookings(&state, &claims, page).await?,
    ))
}

async fn list_users(
    State(state): State<AppState>,
    claims: Claims,
    Query(page): Query<LimitOffset>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    require_role(&claims, infra::models::Role::Admin)?;
    let rows = state.store().list_users(page).await?;
    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}
