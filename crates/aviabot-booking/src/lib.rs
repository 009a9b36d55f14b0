//! Booking persistence and ticket rendering.
//!
//! Bookings are append-only; the most recent record for an identity is the
//! one a ticket is rendered from.

pub mod record;
pub mod store;
pub mod ticket;

pub use record::BookingRecord;
pub use store::{BookingStore, InMemoryBookingStore, SqliteBookingStore};
pub use ticket::{TemplateTicketRenderer, TicketRenderer};
