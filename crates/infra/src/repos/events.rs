use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{EventRow, EventStatus};
use crate::pagination::LimitOffset;
use crate::repos::PgStore;
use crate::store::{EventFilter, EventStore, NewEvent, ReserveOutcome, StoreError};

const EVENT_COLUMNS: &str = "id, organizer_id, title, description, location, event_date, \
     total_seats, available_seats, status, created_at, updated_at";

#[async_trait]
impl EventStore for PgStore {
    async fn insert_event(&self, new: NewEvent) -> Result<EventRow, StoreError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            INSERT INTO events (organizer_id, title, description, location, event_date,
                                total_seats, available_seats, status)
            VALUES ($1, $2, $3, $4, $5, $6, $6, 'pending')
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(new.organizer_id)
        .bind(new.title)
        .bind(new.description)
        .bind(new.location)
        .bind(new.event_date)
        .bind(new.total_seats)
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>, StoreError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn list_events(
        &self,
        filter: EventFilter,
        page: LimitOffset,
    ) -> Result<Vec<EventRow>, StoreError> {
        // NULL-able binds keep this a single prepared statement for every
        // filter combination.
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE ($1::event_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR organizer_id = $2)
            ORDER BY event_date ASC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.status)
        .bind(filter.organizer_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn decide_event(
        &self,
        id: Uuid,
        decision: EventStatus,
    ) -> Result<Option<EventRow>, StoreError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            UPDATE events
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(decision)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn reserve_seat(&self, id: Uuid) -> Result<ReserveOutcome, StoreError> {
        // The whole admission check lives in this one conditional update;
        // concurrent requests serialize on the row and the guard re-evaluates
        // after each write, so the pool can never go negative.
        let reserved = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            UPDATE events
            SET available_seats = available_seats - 1, updated_at = NOW()
            WHERE id = $1 AND status = 'approved' AND available_seats > 0
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        if let Some(event) = reserved {
            return Ok(ReserveOutcome::Reserved(event));
        }

        // No row matched; classify with a follow-up read.
        match self.get_event(id).await? {
            None => Ok(ReserveOutcome::NotFound),
            Some(event) if event.status != EventStatus::Approved => {
                Ok(ReserveOutcome::NotBookable)
            }
            Some(_) => Ok(ReserveOutcome::SoldOut),
        }
    }

    async fn release_seat(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET available_seats = LEAST(available_seats + 1, total_seats), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
