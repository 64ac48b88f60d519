//! Ticket issuance and read-side status derivation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use infra::models::{Role, TicketDetail, TicketRow, TicketStatus};

use crate::auth::{authenticate, require_role, Claims};
use crate::error::AppError;
use crate::services::{EventSummary, UserSummary};
use crate::state::AppState;

/// External ticket identifier: the booking id prefix ties the ticket to its
/// booking, the random suffix keeps ids unguessable and never reused.
pub fn new_ticket_id(booking_id: Uuid) -> String {
    let booking = booking_id.simple().to_string();
    let nonce = Uuid::new_v4().simple().to_string();
    format!("TKT-{}-{}", &booking[..8], &nonce[..12]).to_uppercase()
}

/// Stable verification payload baked into the QR code. Rendering the actual
/// image is a presentation concern; verifiers only need to recover the
/// ticket id and cross-check the holder.
pub fn qr_payload(ticket_id: &str, event_id: Uuid, user_id: Uuid) -> String {
    serde_json::json!({
        "ticketId": ticket_id,
        "eventId": event_id,
        "userId": user_id,
    })
    .to_string()
}

/// An `active` ticket reads as `expired` once the event date has passed.
/// Computed at every read; nothing writes `expired` back to storage.
pub fn effective_status(
    stored: TicketStatus,
    event_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> TicketStatus {
    match stored {
        TicketStatus::Active if now > event_date => TicketStatus::Expired,
        other => other,
    }
}

/// A freshly issued ticket, before any joined detail exists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedTicket {
    pub ticket_id: String,
    pub booking_id: Uuid,
    pub event_id: Uuid,
    pub qr_code: String,
    pub status: TicketStatus,
    pub issued_at: DateTime<Utc>,
}

impl From<TicketRow> for IssuedTicket {
    fn from(row: TicketRow) -> Self {
        Self {
            ticket_id: row.ticket_id,
            booking_id: row.booking_id,
            event_id: row.event_id,
            qr_code: row.qr_code,
            status: row.status,
            issued_at: row.issued_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub ticket_id: String,
    pub booking_id: Uuid,
    pub status: TicketStatus,
    pub qr_code: String,
    pub issued_at: DateTime<Utc>,
    pub event: EventSummary,
    pub user: UserSummary,
}

fn to_response(detail: TicketDetail, now: DateTime<Utc>) -> TicketResponse {
    TicketResponse {
        status: effective_status(detail.status, detail.event_date, now),
        ticket_id: detail.ticket_id,
        booking_id: detail.booking_id,
        qr_code: detail.qr_code,
        issued_at: detail.issued_at,
        event: EventSummary {
            id: detail.event_id,
            title: detail.event_title,
            location: detail.event_location,
            event_date: detail.event_date,
        },
        user: UserSummary {
            name: detail.user_name,
            email: detail.user_email,
        },
    }
}

pub async fn list_my_tickets(
    state: &AppState,
    claims: &Claims,
) -> Result<Vec<TicketResponse>, AppError> {
    let actor = require_role(claims, Role::User)?;
    let rows = state.store().list_tickets_for_user(actor.user_id).await?;
    let now = Utc::now();
    Ok(rows.into_iter().map(|d| to_response(d, now)).collect())
}

pub async fn get_ticket(
    state: &AppState,
    claims: &Claims,
    ticket_id: &str,
) -> Result<TicketResponse, AppError> {
    let actor = authenticate(claims)?;
    let detail = state
        .store()
        .get_ticket(ticket_id)
        .await?
        .ok_or_else(|| AppError::NotFound("ticket not found".to_string()))?;

    if detail.user_id != actor.user_id && actor.role != Role::Admin {
        return Err(AppError::Unauthorized(
            "you do not have access to this ticket".to_string(),
        ));
    }
    Ok(to_response(detail, Utc::now()))
}
