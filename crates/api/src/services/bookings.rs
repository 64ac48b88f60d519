//! The booking ledger: admission, issuance and cancellation.
//!
//! A booking, its ticket and the seat decrement form one logical unit
//! without a multi-entity transaction primitive underneath, so the create
//! path is an explicit saga: every committed step has a compensating action
//! that runs when a later step fails.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use infra::models::{BookingDetail, BookingRow, BookingStatus, Role};
use infra::pagination::LimitOffset;
use infra::store::{NewBooking, NewTicket, ReserveOutcome, Store, StoreError};

use crate::auth::{require_role, Claims};
use crate::error::AppError;
use crate::services::tickets::{new_ticket_id, qr_payload, IssuedTicket};
use crate::services::{EventSummary, UserSummary};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub ticket_id: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<BookingRow> for BookingResponse {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            event_id: row.event_id,
            ticket_id: row.ticket_id,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetailResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub ticket_id: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub event: EventSummary,
    pub user: UserSummary,
}

impl From<BookingDetail> for BookingDetailResponse {
    fn from(d: BookingDetail) -> Self {
        Self {
            id: d.id,
            user_id: d.user_id,
            event_id: d.event_id,
            ticket_id: d.ticket_id,
            status: d.status,
            created_at: d.created_at,
            event: EventSummary {
                id: d.event_id,
                title: d.event_title,
                location: d.event_location,
                event_date: d.event_date,
            },
            user: UserSummary {
                name: d.user_name,
                email: d.user_email,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreated {
    pub booking: BookingResponse,
    pub ticket: IssuedTicket,
}

/// One compensating seat release, retried once. Failures end up as
/// data-integrity alerts in the log; callers decide whether they are fatal.
async fn release_with_retry(store: &dyn Store, event_id: Uuid) -> Result<bool, StoreError> {
    match store.release_seat(event_id).await {
        Ok(found) => Ok(found),
        Err(first) => {
            tracing::warn!(%event_id, error = %first, "seat release failed, retrying once");
            store.release_seat(event_id).await
        }
    }
}

async fn compensate_release(store: &dyn Store, event_id: Uuid, cause: &str) {
    match release_with_retry(store, event_id).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::error!(%event_id, cause, "data integrity alert: reserved seat could not be returned, event missing");
        }
        Err(err) => {
            tracing::error!(%event_id, cause, error = %err, "data integrity alert: reserved seat could not be returned");
        }
    }
}

/// Books one seat for the caller: reserve → record booking → issue ticket.
pub async fn create_booking(
    state: &AppState,
    claims: &Claims,
    event_id: Uuid,
) -> Result<BookingCreated, AppError> {
    // Only attendees book; the check precedes every mutation.
    let actor = require_role(claims, Role::User)?;
    let store = state.store();

    let event = match store.reserve_seat(event_id).await? {
        ReserveOutcome::Reserved(event) => event,
        ReserveOutcome::SoldOut => return Err(AppError::SoldOut),
        ReserveOutcome::NotBookable => return Err(AppError::NotBookable),
        ReserveOutcome::NotFound => {
            return Err(AppError::NotFound("event not found".to_string()))
        }
    };

    let booking_id = Uuid::new_v4();
    let ticket_id = new_ticket_id(booking_id);

    let booking = match store
        .insert_booking(NewBooking {
            id: booking_id,
            user_id: actor.user_id,
            event_id,
            ticket_id: ticket_id.clone(),
        })
        .await
    {
        Ok(booking) => booking,
        Err(err) => {
            compensate_release(store, event_id, "booking insert failed").await;
            return Err(err.into());
        }
    };

    let ticket = match store
        .insert_ticket(NewTicket {
            ticket_id: ticket_id.clone(),
            booking_id,
            user_id: actor.user_id,
            event_id,
            qr_code: qr_payload(&ticket_id, event_id, actor.user_id),
        })
        .await
    {
        Ok(ticket) => ticket,
        Err(err) => {
            if let Err(delete_err) = store.delete_booking(booking_id).await {
                tracing::error!(
                    %booking_id,
                    error = %delete_err,
                    "data integrity alert: booking left behind after ticket issuance failure"
                );
            }
            compensate_release(store, event_id, "ticket issuance failed").await;
            return Err(err.into());
        }
    };

    let notifier = state.notifier();
    let notify_ticket = ticket.clone();
    let recipient = claims.email.clone();
    tokio::spawn(async move {
        notifier.ticket_issued(notify_ticket, event, recipient).await;
    });

    Ok(BookingCreated {
        booking: booking.into(),
        ticket: ticket.into(),
    })
}

/// Cancels the booking behind a ticket and returns the seat to the pool.
/// The booking flip, the ticket flip and the seat release are one failure
/// unit: any failed step surfaces an error instead of a silent success.
pub async fn cancel_booking(
    state: &AppState,
    claims: &Claims,
    ticket_id: &str,
) -> Result<BookingResponse, AppError> {
    let actor = require_role(claims, Role::User)?;
    let store = state.store();

    let booking = store
        .get_booking_by_ticket(ticket_id)
        .await?
        .ok_or_else(|| AppError::NotFound("ticket not found".to_string()))?;

    if booking.user_id != actor.user_id {
        return Err(AppError::Unauthorized(
            "you do not own this booking".to_string(),
        ));
    }
    if booking.status != BookingStatus::Confirmed {
        return Err(AppError::AlreadyCancelled);
    }

    // Conditional transition: a concurrent cancellation of the same booking
    // loses here instead of releasing the seat a second time.
    let cancelled = store
        .cancel_booking(booking.id)
        .await?
        .ok_or(AppError::AlreadyCancelled)?;

    if store.cancel_ticket(ticket_id).await?.is_none() {
        tracing::error!(
            ticket_id,
            booking_id = %booking.id,
            "data integrity alert: booking cancelled but its ticket was not active"
        );
        return Err(AppError::Internal(
            "cancellation incomplete: ticket could not be cancelled".to_string(),
        ));
    }

    match release_with_retry(store, booking.event_id).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::error!(
                event_id = %booking.event_id,
                "data integrity alert: cancelled booking but event is missing"
            );
            return Err(AppError::Internal(
                "cancellation incomplete: seat could not be restored".to_string(),
            ));
        }
        Err(err) => {
            tracing::error!(
                event_id = %booking.event_id,
                error = %err,
                "data integrity alert: seat release failed after retry"
            );
            return Err(err.into());
        }
    }

    Ok(cancelled.into())
}

pub async fn list_my_bookings(
    state: &AppState,
    claims: &Claims,
) -> Result<Vec<BookingDetailResponse>, AppError> {
    let actor = require_role(claims, Role::User)?;
    let rows = state.store().list_bookings_for_user(actor.user_id).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn list_organizer_bookings(
    state: &AppState,
    claims: &Claims,
) -> Result<Vec<BookingDetailResponse>, AppError> {
    let actor = require_role(claims, Role::Organizer)?;
    let rows = state
        .store()
        .list_bookings_for_organizer(actor.user_id)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn list_all_bookings(
    state: &AppState,
    claims: &Claims,
    page: LimitOffset,
) -> Result<Vec<BookingDetailResponse>, AppError> {
    require_role(claims, Role::Admin)?;
    let rows = state.store().list_bookings(page).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}
