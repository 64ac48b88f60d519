pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    BookingDetail, BookingRow, EventRow, EventStatus, TicketDetail, TicketRow, UserRow,
};
use crate::pagination::LimitOffset;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error")]
    Db(#[from] sqlx::Error),
}

/// Result of the atomic check-and-decrement on an event's seat counter.
#[derive(Debug, Clone)]
pub enum ReserveOutcome {
    Reserved(EventRow),
    SoldOut,
    NotBookable,
    NotFound,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub organizer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub event_date: DateTime<Utc>,
    pub total_seats: i32,
}

#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub organizer_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub ticket_id: String,
}

#[derive(Debug, Clone)]
pub struct NewTicket {
    pub ticket_id: String,
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub qr_code: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: crate::models::Role,
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Creates an event with status `pending` and a full seat pool.
    async fn insert_event(&self, new: NewEvent) -> Result<EventRow, StoreError>;

    async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>, StoreError>;

    async fn list_events(
        &self,
        filter: EventFilter,
        page: LimitOffset,
    ) -> Result<Vec<EventRow>, StoreError>;

    /// Approves or rejects an event. Only transitions events that are still
    /// `pending`; returns `None` when the event is missing or already decided.
    async fn decide_event(
        &self,
        id: Uuid,
        decision: EventStatus,
    ) -> Result<Option<EventRow>, StoreError>;

    /// Atomically takes one seat: the check and the decrement are a single
    /// conditional update, so concurrent callers can never both take the
    /// last seat.
    async fn reserve_seat(&self, id: Uuid) -> Result<ReserveOutcome, StoreError>;

    /// Returns one seat to the pool, capped at `total_seats`. Returns whether
    /// the event existed.
    async fn release_seat(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert_booking(&self, new: NewBooking) -> Result<BookingRow, StoreError>;

    async fn get_booking_by_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Option<BookingRow>, StoreError>;

    /// Removes a booking outright. Only used to unwind a half-finished
    /// booking when ticket issuance fails.
    async fn delete_booking(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Transitions a booking from `confirmed` to `cancelled`. Returns `None`
    /// when the booking is missing or was already cancelled, so two racing
    /// cancellations cannot both release the seat.
    async fn cancel_booking(&self, id: Uuid) -> Result<Option<BookingRow>, StoreError>;

    async fn list_bookings_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<BookingDetail>, StoreError>;

    /// Bookings made against any event owned by the given organizer.
    async fn list_bookings_for_organizer(
        &self,
        organizer_id: Uuid,
    ) -> Result<Vec<BookingDetail>, StoreError>;

    async fn list_bookings(&self, page: LimitOffset) -> Result<Vec<BookingDetail>, StoreError>;
}

#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn insert_ticket(&self, new: NewTicket) -> Result<TicketRow, StoreError>;

    async fn get_ticket(&self, ticket_id: &str) -> Result<Option<TicketDetail>, StoreError>;

    /// Transitions a ticket from `active` to `cancelled`, in lockstep with
    /// its booking. Returns `None` when the ticket is missing or not active.
    async fn cancel_ticket(&self, ticket_id: &str) -> Result<Option<TicketRow>, StoreError>;

    async fn list_tickets_for_user(&self, user_id: Uuid)
        -> Result<Vec<TicketDetail>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `StoreError::Conflict` when the email is already taken.
    async fn insert_user(&self, new: NewUser) -> Result<UserRow, StoreError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>, StoreError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError>;

    async fn list_users(&self, page: LimitOffset) -> Result<Vec<UserRow>, StoreError>;
}

#[async_trait]
pub trait Store: EventStore + BookingStore + TicketStore + UserStore + Send + Sync {
    /// Liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
