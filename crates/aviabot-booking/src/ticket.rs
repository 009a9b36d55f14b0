use crate::store::BookingStore;
use aviabot_core::{AviabotError, AviabotResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Renders the electronic ticket for the latest booking of an identity.
#[async_trait]
pub trait TicketRenderer: Send + Sync {
    async fn render(&self, identity: &str) -> AviabotResult<Vec<u8>>;
}

/// Fixed section layout, in drawing order.
const SECTIONS: [&str; 5] = [
    "Имя пассажира:",
    "Рейс:",
    "Количество мест:",
    "Телефон для подтверждения:",
    "Перевозчик:",
];

/// Default renderer: lays the latest booking out over the fixed ticket
/// sections and returns the encoded bytes.
pub struct TemplateTicketRenderer {
    bookings: Arc<dyn BookingStore>,
    carrier: String,
}

impl TemplateTicketRenderer {
    pub fn new(bookings: Arc<dyn BookingStore>, carrier: impl Into<String>) -> Self {
        Self {
            bookings,
            carrier: carrier.into(),
        }
    }
}

#[async_trait]
impl TicketRenderer for TemplateTicketRenderer {
    async fn render(&self, identity: &str) -> AviabotResult<Vec<u8>> {
        let booking = self
            .bookings
            .latest(identity)
            .await?
            .ok_or_else(|| AviabotError::Ticket(format!("no booking for identity {identity}")))?;

        let values = [
            booking.display_name,
            booking.flight_summary,
            booking.seat_count.to_string(),
            booking.phone_number,
            self.carrier.clone(),
        ];

        let mut out = String::new();
        for (section, value) in SECTIONS.iter().zip(values.iter()) {
            out.push_str(section);
            out.push('\n');
            out.push_str(value);
            out.push_str("\n\n");
        }
        Ok(out.into_bytes())
    }
}
