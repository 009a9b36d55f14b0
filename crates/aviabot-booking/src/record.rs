use serde::{Deserialize, Serialize};

/// Durable outcome of a fully completed booking form. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub identity: String,
    pub display_name: String,
    /// Rendered summary of the chosen flight.
    pub flight_summary: String,
    pub seat_count: u32,
    pub comment: String,
    pub phone_number: String,
}
