use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};

use crate::auth::Claims;
use crate::error::AppError;
use crate::services::bookings::{self, BookingDetailResponse, BookingResponse};
use crate::services::tickets::{self, TicketResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tickets/my-tickets", get(my_tickets))
        .route("/tickets/organizer/bookings", get(organizer_bookings))
        .route("/tickets/:ticket_id", get(get_ticket))
        .route("/tickets/:ticket_id/cancel", put(cancel_ticket))
}

async fn my_tickets(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<TicketResponse>>, AppError> {
    Ok(Json(tickets::list_my_tickets(&state, &claims).await?))
}

async fn get_ticket(
    State(state): State<AppState>,
    claims: Claims,
    Path(ticket_id): Path<String>,
) -> Result<Json<TicketResponse>, AppError> {
    Ok(Json(tickets::get_ticket(&state, &claims, &ticket_id).await?))
}

/// Cancelling a ticket cancels its booking and restores the seat.
async fn cancel_ticket(
    State(state): State<AppState>,
    claims: Claims,
    Path(ticket_id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    Ok(Json(
        bookings::cancel_booking(&state, &claims, &ticket_id).await?,
    ))
}

async fn organizer_bookings(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<BookingDetailResponse>>, AppError> {
    Ok(Json(
        bookings::list_organizer_bookings(&state, &claims).await?,
    ))
}
