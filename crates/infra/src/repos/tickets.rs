use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{TicketDetail, TicketRow};
use crate::repos::PgStore;
use crate::store::{NewTicket, StoreError, TicketStore};

const TICKET_COLUMNS: &str =
    "id, ticket_id, booking_id, user_id, event_id, qr_code, status, issued_at";

const DETAIL_SELECT: &str = r#"
    SELECT t.id, t.ticket_id, t.booking_id, t.user_id, t.event_id, t.qr_code,
           t.status, t.issued_at,
           e.title AS event_title, e.description AS event_description,
           e.location AS event_location, e.event_date AS event_date,
           u.name AS user_name, u.email AS user_email
    FROM tickets t
    JOIN events e ON e.id = t.event_id
    JOIN users u ON u.id = t.user_id
"#;

#[async_trait]
impl TicketStore for PgStore {
    async fn insert_ticket(&self, new: NewTicket) -> Result<TicketRow, StoreError> {
        let result = sqlx::query_as::<_, TicketRow>(&format!(
            r#"
            INSERT INTO tickets (ticket_id, booking_id, user_id, event_id, qr_code, status)
            VALUES ($1, $2, $3, $4, $5, 'active')
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(new.ticket_id)
        .bind(new.booking_id)
        .bind(new.user_id)
        .bind(new.event_id)
        .bind(new.qr_code)
        .fetch_one(self.pool())
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                StoreError::Conflict("ticket id already exists".to_string()),
            ),
            Err(err) => Err(err.into()),
        }
    }

    async fn get_ticket(&self, ticket_id: &str) -> Result<Option<TicketDetail>, StoreError> {
        let row = sqlx::query_as::<_, TicketDetail>(&format!(
            "{DETAIL_SELECT} WHERE t.ticket_id = $1"
        ))
        .bind(ticket_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn cancel_ticket(&self, ticket_id: &str) -> Result<Option<TicketRow>, StoreError> {
        let row = sqlx::query_as::<_, TicketRow>(&format!(
            r#"
            UPDATE tickets
            SET status = 'cancelled'
            WHERE ticket_id = $1 AND status = 'active'
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(ticket_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn list_tickets_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<TicketDetail>, StoreError> {
        let rows = sqlx::query_as::<_, TicketDetail>(&format!(
            "{DETAIL_SELECT} WHERE t.user_id = $1 ORDER BY t.issued_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }
}
