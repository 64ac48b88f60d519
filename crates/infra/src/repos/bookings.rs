use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{BookingDetail, BookingRow};
use crate::pagination::LimitOffset;
use crate::repos::PgStore;
use crate::store::{BookingStore, NewBooking, StoreError};

const BOOKING_COLUMNS: &str =
    "id, user_id, event_id, ticket_id, status, created_at, updated_at";

const DETAIL_SELECT: &str = r#"
    SELECT b.id, b.user_id, b.event_id, b.ticket_id, b.status, b.created_at,
           e.title AS event_title, e.location AS event_location, e.event_date AS event_date,
           u.name AS user_name, u.email AS user_email
    FROM bookings b
    JOIN events e ON e.id = b.event_id
    JOIN users u ON u.id = b.user_id
"#;

#[async_trait]
impl BookingStore for PgStore {
    async fn insert_booking(&self, new: NewBooking) -> Result<BookingRow, StoreError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            INSERT INTO bookings (id, user_id, event_id, ticket_id, status)
            VALUES ($1, $2, $3, $4, 'confirmed')
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(new.id)
        .bind(new.user_id)
        .bind(new.event_id)
        .bind(new.ticket_id)
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }

    async fn get_booking_by_ticket(
        &self,
        ticket_id: &str,
    ) -> Result<Option<BookingRow>, StoreError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE ticket_id = $1"
        ))
        .bind(ticket_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn delete_booking(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn cancel_booking(&self, id: Uuid) -> Result<Option<BookingRow>, StoreError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            UPDATE bookings
            SET status = 'cancelled', updated_at = NOW()
            WHERE id = $1 AND status = 'confirmed'
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn list_bookings_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<BookingDetail>, StoreError> {
        let rows = sqlx::query_as::<_, BookingDetail>(&format!(
            "{DETAIL_SELECT} WHERE b.user_id = $1 ORDER BY b.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn list_bookings_for_organizer(
        &self,
        organizer_id: Uuid,
    ) -> Result<Vec<BookingDetail>, StoreError> {
        let rows = sqlx::query_as::<_, BookingDetail>(&format!(
            "{DETAIL_SELECT} WHERE e.organizer_id = $1 ORDER BY b.created_at DESC"
        ))
        .bind(organizer_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn list_bookings(&self, page: LimitOffset) -> Result<Vec<BookingDetail>, StoreError> {
        let rows = sqlx::query_as::<_, BookingDetail>(&format!(
            "{DETAIL_SELECT} ORDER BY b.created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }
}
