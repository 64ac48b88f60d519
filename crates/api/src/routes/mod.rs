pub mod admin;
pub mod auth;
pub mod bookings;
pub mod events;
pub mod tickets;

use axum::Router;

use crate::state::AppState;

/// Everything mounted under `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(events::router())
        .merge(bookings::router())
        .merge(tickets::router())
        .nest("/admin", admin::router())
}
