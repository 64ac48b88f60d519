use async_trait::async_trait;

use infra::models::{EventRow, TicketRow};

/// Outbound ticket-delivery boundary. Invoked fire-and-forget after a
/// successful issuance; a failed delivery never rolls back the booking.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn ticket_issued(&self, ticket: TicketRow, event: EventRow, recipient: String);
}

/// Default delivery backend: logs the notification instead of sending mail.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn ticket_issued(&self, ticket: TicketRow, event: EventRow, recipient: String) {
        tracing::info!(
            ticket_id = %ticket.ticket_id,
            event = %event.title,
            recipient = %recipient,
            "ticket issued"
        );
    }
}
