//! Route table and candidate-flight generation.
//!
//! The engine validates city names against [`routes::is_city`] and asks a
//! [`FlightGenerator`] for exactly five candidate flights once a date is
//! accepted.

pub mod generator;
pub mod routes;

pub use generator::{FlightGenerator, FlightOption, ScheduleGenerator, FLIGHTS_PER_QUERY};
