//! In-memory store used by the test suite and for dependency-free local runs.
//!
//! Semantics mirror the Postgres implementation: seat reservation is a
//! check-and-decrement performed under a single write lock, and the
//! cancellation transitions are conditional on the current status.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    BookingDetail, BookingRow, BookingStatus, EventRow, EventStatus, TicketDetail, TicketRow,
    TicketStatus, UserRow,
};
use crate::pagination::LimitOffset;
use crate::store::{
    BookingStore, EventFilter, EventStore, NewBooking, NewEvent, NewTicket, NewUser,
    ReserveOutcome, Store, StoreError, TicketStore, UserStore,
};

#[derive(Default)]
struct MemInner {
    events: HashMap<Uuid, EventRow>,
    bookings: HashMap<Uuid, BookingRow>,
    tickets: HashMap<String, TicketRow>,
    users: HashMap<Uuid, UserRow>,
}

#[derive(Clone, Default)]
pub struct MemStore {
    inner: Arc<RwLock<MemInner>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page<T>(mut rows: Vec<T>, page: LimitOffset) -> Vec<T> {
    let offset = page.offset.max(0) as usize;
    let limit = page.limit.max(0) as usize;
    if offset >= rows.len() {
        return Vec::new();
    }
    rows.drain(..offset);
    rows.truncate(limit);
    rows
}

fn booking_detail(inner: &MemInner, booking: &BookingRow) -> Option<BookingDetail> {
    let event = inner.events.get(&booking.event_id)?;
    let user = inner.users.get(&booking.user_id)?;
    Some(BookingDetail {
        id: booking.id,
        user_id: booking.user_id,
        event_id: booking.event_id,
        ticket_id: booking.ticket_id.clone(),
        status: booking.status,
        created_at: booking.created_at,
        event_title: event.title.clone(),
        event_location: event.location.clone(),
        event_date: event.event_date,
        user_name: user.name.clone(),
        user_email: user.email.clone(),
    })
}

fn ticket_detail(inner: &MemInner, ticket: &TicketRow) -> Option<TicketDetail> {
    let event = inner.events.get(&ticket.event_id)?;
    let user = inner.users.get(&ticket.user_id)?;
    Some(TicketDetail {
        id: ticket.id,
        ticket_id: ticket.ticket_id.clone(),
        booking_id: ticket.booking_id,
        user_id: ticket.user_id,
        event_id: ticket.event_id,
        qr_code: ticket.qr_code.clone(),
        status: ticket.status,
        issued_at: ticket.issued_at,
        event_title: event.title.clone(),
        event_description: event.description.clone(),
        event_location: event.location.clone(),
        event_date: event.event_date,
        user_name: user.name.clone(),
        user_email: user.email.clone(),
    })
}

#[async_trait]
impl EventStore for MemStore {
    async fn insert_event(&self, new: NewEvent) -> Result<EventRow, StoreError> {
        let now = Utc::now();
        let row = EventRow {
            id: Uuid::new_v4(),
            organizer_id: new.organizer_id,
            title: new.title,
            description: new.description,
            location: new.location,
            event_date: new.event_date,
            total_seats: new.total_seats,
            available_seats: new.total_seats,
            status: EventStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let mut inner = self.inner.write().await;
        inner.events.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.events.get(&id).cloned())
    }

    async fn list_events(
        &self,
        filter: EventFilter,
        page_params: LimitOffset,
    ) -> Result<Vec<EventRow>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<EventRow> = inner
            .events
            .values()
            .filter(|e| filter.status.map_or(true, |s| e.status == s))
            .filter(|e| filter.organizer_id.map_or(true, |o| e.organizer_id == o))
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.event_date);
        Ok(page(rows, page_params))
    }

    async fn decide_event(
        &self,
        id: Uuid,
        decision: EventStatus,
    ) -> Result<Option<EventRow>, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.events.get_mut(&id) {
            Some(event) if event.status == EventStatus::Pending => {
                event.status = decision;
                event.updated_at = Utc::now();
                Ok(Some(event.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn reserve_seat(&self, id: Uuid) -> Result<ReserveOutcome, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(event) = inner.events.get_mut(&id) else {
            return Ok(ReserveOutcome::NotFound);
        };
        if event.status != EventStatus::Approved {
            return Ok(ReserveOutcome::NotBookable);
        }
        if event.available_seats == 0 {
            return Ok(ReserveOutcome::SoldOut);
        }
        event.available_seats -= 1;
        event.updated_at = Utc::now();
        Ok(ReserveOutcome::Reserved(event.clone()))
    }

    async fn release_seat(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.events.get_mut(&id) {
            Some(event) => {
                event.available_seats = (event.available_seats + 1).min(event.total_seats);
                event.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl BookingStore for MemStore {
    async fn insert_booking(&self, new: NewBooking) -> Result<BookingRow, StoreError> {
        let now = Utc::now();
        let row = BookingRow {
            id: new.id,
            user_id: new.user_id,
            event_id: new.event_id,
            ticket_id: new.ticket_id,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        };
        let mut inner = self.inner.write().await;
        inner.bookings.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_booking_by_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Option<BookingRow>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .bookings
            .values()
            .find(|b| b.ticket_id == ticket_id)
            .cloned())
    }

    async fn delete_booking(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.bookings.remove(&id).is_some())
    }

    async fn cancel_booking(&self, id: Uuid) -> Result<Option<BookingRow>, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.bookings.get_mut(&id) {
            Some(booking) if booking.status == BookingStatus::Confirmed => {
                booking.status = BookingStatus::Cancelled;
                booking.updated_at = Utc::now();
                Ok(Some(booking.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list_bookings_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<BookingDetail>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<BookingDetail> = inner
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .filter_map(|b| booking_detail(&inner, b))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_bookings_for_organizer(
        &self,
        organizer_id: Uuid,
    ) -> Result<Vec<BookingDetail>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<BookingDetail> = inner
            .bookings
            .values()
            .filter(|b| {
                inner
                    .events
                    .get(&b.event_id)
                    .map_or(false, |e| e.organizer_id == organizer_id)
            })
            .filter_map(|b| booking_detail(&inner, b))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_bookings(&self, page_params: LimitOffset) -> Result<Vec<BookingDetail>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<BookingDetail> = inner
            .bookings
            .values()
            .filter_map(|b| booking_detail(&inner, b))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(rows, page_params))
    }
}

#[async_trait]
impl TicketStore for MemStore {
    async fn insert_ticket(&self, new: NewTicket) -> Result<TicketRow, StoreError> {
        let row = TicketRow {
            id: Uuid::new_v4(),
            ticket_id: new.ticket_id,
            booking_id: new.booking_id,
            user_id: new.user_id,
            event_id: new.event_id,
            qr_code: new.qr_code,
            status: TicketStatus::Active,
            issued_at: Utc::now(),
        };
        let mut inner = self.inner.write().await;
        if inner.tickets.contains_key(&row.ticket_id) {
            return Err(StoreError::Conflict(format!(
                "ticket id {} already exists",
                row.ticket_id
            )));
        }
        inner.tickets.insert(row.ticket_id.clone(), row.clone());
        Ok(row)
    }

    async fn get_ticket(&self, ticket_id: &str) -> Result<Option<TicketDetail>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .tickets
            .get(ticket_id)
            .and_then(|t| ticket_detail(&inner, t)))
    }

    async fn cancel_ticket(&self, ticket_id: &str) -> Result<Option<TicketRow>, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.tickets.get_mut(ticket_id) {
            Some(ticket) if ticket.status == TicketStatus::Active => {
                ticket.status = TicketStatus::Cancelled;
                Ok(Some(ticket.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list_tickets_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<TicketDetail>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<TicketDetail> = inner
            .tickets
            .values()
            .filter(|t| t.user_id == user_id)
            .filter_map(|t| ticket_detail(&inner, t))
            .collect();
        rows.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(rows)
    }
}

#[async_trait]
impl UserStore for MemStore {
    async fn insert_user(&self, new: NewUser) -> Result<UserRow, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == new.email) {
            return Err(StoreError::Conflict(format!(
                "email {} already registered",
                new.email
            )));
        }
        let now = Utc::now();
        let row = UserRow {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, page_params: LimitOffset) -> Result<Vec<UserRow>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<UserRow> = inner.users.values().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(rows, page_params))
    }
}

#[async_trait]
impl Store for MemStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn seeded_event(store: &MemStore, seats: i32, status: EventStatus) -> Uuid {
        let organizer = store
            .insert_user(NewUser {
                name: "Org".into(),
                email: format!("org-{}@example.com", Uuid::new_v4()),
                password_hash: "hash".into(),
                role: crate::models::Role::Organizer,
            })
            .await
            .unwrap();
        let event = store
            .insert_event(NewEvent {
                organizer_id: organizer.id,
                title: "Show".into(),
                description: None,
                location: "Hall".into(),
                event_date: Utc::now() + Duration::days(7),
                total_seats: seats,
            })
            .await
            .unwrap();
        if status != EventStatus::Pending {
            store.decide_event(event.id, status).await.unwrap();
        }
        event.id
    }

    #[tokio::test]
    async fn reserve_drains_the_pool_then_reports_sold_out() {
        let store = MemStore::new();
        let event_id = seeded_event(&store, 2, EventStatus::Approved).await;

        assert!(matches!(
            store.reserve_seat(event_id).await.unwrap(),
            ReserveOutcome::Reserved(_)
        ));
        assert!(matches!(
            store.reserve_seat(event_id).await.unwrap(),
            ReserveOutcome::Reserved(e) if e.available_seats == 0
        ));
        assert!(matches!(
            store.reserve_seat(event_id).await.unwrap(),
            ReserveOutcome::SoldOut
        ));
    }

    #[tokio::test]
    async fn reserve_refuses_undecided_events() {
        let store = MemStore::new();
        let event_id = seeded_event(&store, 5, EventStatus::Pending).await;
        assert!(matches!(
            store.reserve_seat(event_id).await.unwrap(),
            ReserveOutcome::NotBookable
        ));
        let event = store.get_event(event_id).await.unwrap().unwrap();
        assert_eq!(event.available_seats, 5);
    }

    #[tokio::test]
    async fn release_is_capped_at_total_seats() {
        let store = MemStore::new();
        let event_id = seeded_event(&store, 3, EventStatus::Approved).await;
        assert!(store.release_seat(event_id).await.unwrap());
        let event = store.get_event(event_id).await.unwrap().unwrap();
        assert_eq!(event.available_seats, 3);
    }

    #[tokio::test]
    async fn decide_event_is_terminal() {
        let store = MemStore::new();
        let event_id = seeded_event(&store, 3, EventStatus::Rejected).await;
        let second = store
            .decide_event(event_id, EventStatus::Approved)
            .await
            .unwrap();
        assert!(second.is_none());
    }
}
