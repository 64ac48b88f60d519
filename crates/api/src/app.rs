use std::time::Duration;

use axum::{extract::State, middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::middleware::AuthMiddleware;
use crate::error::AppError;
use crate::routes;
use crate::state::AppState;

/// Build the Axum router: health endpoint plus the `/api` surface.
pub fn build_router(state: AppState) -> Router {
    let api = routes::api_router().layer(middleware::from_fn_with_state(
        state.clone(),
        AuthMiddleware::optional_jwt_auth,
    ));

    Router::new()
        // Simple liveness check; also proves store connectivity.
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
        // Useful default middlewares
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive())
}

async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state.store().ping().await?;
    Ok("ok")
}
