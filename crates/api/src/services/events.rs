//! Event submission, review and visibility rules.
//!
//! Events enter as `pending`, become publicly listable and bookable only
//! once an admin approves them, and a decision is terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use infra::models::{EventRow, EventStatus, Role};
use infra::pagination::LimitOffset;
use infra::store::{EventFilter, NewEvent};

use crate::auth::{authenticate, require_role, Claims};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub event_date: DateTime<Utc>,
    pub total_seats: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub event_date: DateTime<Utc>,
    pub total_seats: i32,
    pub available_seats: i32,
    pub status: EventStatus,
    pub organizer_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<EventRow> for EventResponse {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            event_date: row.event_date,
            total_seats: row.total_seats,
            available_seats: row.available_seats,
            status: row.status,
            organizer_id: row.organizer_id,
            created_at: row.created_at,
        }
    }
}

pub async fn submit_event(
    state: &AppState,
    claims: &Claims,
    req: SubmitEventRequest,
) -> Result<EventResponse, AppError> {
    let actor = require_role(claims, Role::Organizer)?;

    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    if req.location.trim().is_empty() {
        return Err(AppError::Validation(
            "location must not be empty".to_string(),
        ));
    }
    if req.total_seats < 1 {
        return Err(AppError::Validation(
            "totalSeats must be a positive integer".to_string(),
        ));
    }

    let row = state
        .store()
        .insert_event(NewEvent {
            organizer_id: actor.user_id,
            title: req.title.trim().to_string(),
            description: req.description,
            location: req.location.trim().to_string(),
            event_date: req.event_date,
            total_seats: req.total_seats,
        })
        .await?;
    Ok(row.into())
}

pub async fn review_event(
    state: &AppState,
    claims: &Claims,
    event_id: Uuid,
    decision: EventStatus,
) -> Result<EventResponse, AppError> {
    require_role(claims, Role::Admin)?;

    if decision == EventStatus::Pending {
        return Err(AppError::Validation(
            "decision must be approved or rejected".to_string(),
        ));
    }

    match state.store().decide_event(event_id, decision).await? {
        Some(row) => Ok(row.into()),
        // The conditional update matched nothing: either the event does not
        // exist or it already left `pending`. Decisions are terminal.
        None => match state.store().get_event(event_id).await? {
            None => Err(AppError::NotFound("event not found".to_string())),
            Some(_) => Err(AppError::Validation(
                "event has already been reviewed".to_string(),
            )),
        },
    }
}

pub async fn get_event(
    state: &AppState,
    claims: Option<&Claims>,
    event_id: Uuid,
) -> Result<EventResponse, AppError> {
    let row = state
        .store()
        .get_event(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("event not found".to_string()))?;

    if row.status == EventStatus::Approved {
        return Ok(row.into());
    }

    // Undecided and rejected events exist only for their organizer and for
    // admins; everyone else sees them as absent rather than forbidden.
    if let Some(claims) = claims {
        let actor = authenticate(claims)?;
        if actor.role == Role::Admin || actor.user_id == row.organizer_id {
            return Ok(row.into());
        }
    }
    Err(AppError::NotFound("event not found".to_string()))
}

pub async fn list_public_events(
    state: &AppState,
    page: LimitOffset,
) -> Result<Vec<EventResponse>, AppError> {
    let rows = state
        .store()
        .list_events(
            EventFilter {
                status: Some(EventStatus::Approved),
                organizer_id: None,
            },
            page,
        )
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn list_my_events(
    state: &AppState,
    claims: &Claims,
    page: LimitOffset,
) -> Result<Vec<EventResponse>, AppError> {
    let actor = require_role(claims, Role::Organizer)?;
    let rows = state
        .store()
        .list_events(
            EventFilter {
                status: None,
                organizer_id: Some(actor.user_id),
            },
            page,
        )
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn list_all_events(
    state: &AppState,
    claims: &Claims,
    page: LimitOffset,
) -> Result<Vec<EventResponse>, AppError> {
    require_role(claims, Role::Admin)?;
    let rows = state
        .store()
        .list_events(EventFilter::default(), page)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}
