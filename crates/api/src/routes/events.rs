use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use infra::pagination::LimitOffset;

use crate::auth::Claims;
use crate::error::AppError;
use crate::services::events::{self, EventResponse, SubmitEventRequest};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(submit_event))
        .route("/events/:event_id", get(get_event))
        .route("/events/organizer/my-events", get(my_events))
}

async fn list_events(
    State(state): State<AppState>,
    Query(page): Query<LimitOffset>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    Ok(Json(events::list_public_events(&state, page).await?))
}

async fn get_event(
    State(state): State<AppState>,
    claims: Option<Claims>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventResponse>, AppError> {
    Ok(Json(
        events::get_event(&state, claims.as_ref(), event_id).await?,
    ))
}

async fn submit_event(
    State(state): State<AppState>,
    claims: Claims,
    Json(req): Json<SubmitEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    let event = events::submit_event(&state, &claims, req).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn my_events(
    State(state): State<AppState>,
    claims: Claims,
    Query(page): Query<LimitOffset>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    Ok(Json(events::list_my_events(&state, &claims, page).await?))
}
