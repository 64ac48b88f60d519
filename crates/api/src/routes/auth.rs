use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use infra::models::Role;
use infra::store::{NewUser, StoreError};

use crate::auth::password::PasswordService;
use crate::error::AppError;
use crate::services::UserResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    let email = req.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(AppError::Validation("invalid email address".to_string()));
    }
    PasswordService::validate_password_strength(&req.password)?;

    // Admin accounts are provisioned out of band, never self-registered.
    let role = req.role.unwrap_or(Role::User);
    if role == Role::Admin {
        return Err(AppError::Validation(
            "role must be user or organizer".to_string(),
        ));
    }

    let password_hash = PasswordService::hash_password(&req.password)?;
    let user = state
        .store()
        .insert_user(NewUser {
            name: name.to_string(),
            email,
            password_hash,
            role,
        })
        .await
        .map_err(|err| match err {
            StoreError::Conflict(_) => {
                AppError::Validation("email already registered".to_string())
            }
            other => other.into(),
        })?;

    let token = state.jwt_service().create_token(&user)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = req.email.trim().to_lowercase();
    let user = state
        .store()
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid credentials".to_string()))?;

    if !PasswordService::verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("invalid credentials".to_string()));
    }

    let token = state.jwt_service().create_token(&user)?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}
