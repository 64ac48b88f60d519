use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::AppError;
use crate::services::bookings::{self, BookingCreated, BookingDetailResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bookings/my-bookings", get(my_bookings))
        .route("/bookings/:event_id", post(create_booking))
}

async fn create_booking(
    State(state): State<AppState>,
    claims: Claims,
    Path(event_id): Path<Uuid>,
) -> Result<(StatusCode, Json<BookingCreated>), AppError> {
    let created = bookings::create_booking(&state, &claims, event_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn my_bookings(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<BookingDetailResponse>>, AppError> {
    Ok(Json(bookings::list_my_bookings(&state, &claims).await?))
}
