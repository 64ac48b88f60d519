use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;

pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Verifies a bearer token when one is present and stashes the claims in
    /// the request extensions. Requests without (or with invalid) credentials
    /// pass through unauthenticated; handlers that need an identity extract
    /// [`Claims`] and reject there.
    pub async fn optional_jwt_auth(
        State(state): State<AppState>,
        mut request: Request,
        next: Next,
    ) -> Response {
        let jwt_service = state.jwt_service();

        if let Some(auth_header) = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
        {
            if let Some(token) = auth_header.strip_prefix("Bearer ") {
                if let Ok(claims) = jwt_service.verify_token(token) {
                    request.extensions_mut().insert(claims);
                }
            }
        }

        next.run(request).await
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Claims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))
    }
}
