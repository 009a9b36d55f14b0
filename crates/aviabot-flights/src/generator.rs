use crate::routes;
use aviabot_core::{AviabotError, AviabotResult};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Number of candidate flights offered per query. The flight-choice step's
/// `1..=5` indexing depends on this cardinality.
pub const FLIGHTS_PER_QUERY: usize = 5;

/// One candidate flight offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightOption {
    /// Departure label, `HH:MM DD-MM-YYYY`.
    pub departure: String,
    /// Arrival label, `HH:MM DD-MM-YYYY`.
    pub arrival: String,
    /// Flight time in hours.
    pub hours: u32,
}

/// Produces the candidate flights for a route and date.
///
/// Implementations must return exactly [`FLIGHTS_PER_QUERY`] options sorted
/// ascending by departure time.
#[async_trait]
pub trait FlightGenerator: Send + Sync {
    async fn generate(
        &self,
        city_from: &str,
        city_to: &str,
        date: NaiveDate,
    ) -> AviabotResult<Vec<FlightOption>>;
}

/// Default generator: pseudo-random departures within 72 hours of the chosen
/// date at 10-minute granularity, flight time taken from the route table.
///
/// The RNG is seedable so tests get a reproducible schedule.
pub struct ScheduleGenerator {
    rng: Mutex<StdRng>,
}

impl ScheduleGenerator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for ScheduleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FlightGenerator for ScheduleGenerator {
    async fn generate(
        &self,
        city_from: &str,
        city_to: &str,
        date: NaiveDate,
    ) -> AviabotResult<Vec<FlightOption>> {
        let hours = routes::flight_hours(city_from, city_to).ok_or_else(|| {
            AviabotError::Flights(format!("no route between {city_from} and {city_to}"))
        })?;

        let midnight = date.and_time(NaiveTime::MIN);
        let mut departures: Vec<NaiveDateTime> = Vec::with_capacity(FLIGHTS_PER_QUERY);
        {
            let mut rng = self.rng.lock();
            for _ in 0..FLIGHTS_PER_QUERY {
                let offset_hours = rng.gen_range(0..=72);
                let minute = rng.gen_range(0..6) * 10;
                departures
                    .push(midnight + Duration::hours(offset_hours) + Duration::minutes(minute));
            }
        }
        departures.sort_unstable();

        Ok(departures
            .into_iter()
            .map(|dep| {
                let arr = dep + Duration::hours(i64::from(hours));
                FlightOption {
                    departure: dep.format("%H:%M %d-%m-%Y").to_string(),
                    arrival: arr.format("%H:%M %d-%m-%Y").to_string(),
                    hours,
                }
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_generates_exactly_five() {
        let gen = ScheduleGenerator::with_seed(7);
        let flights = gen
            .generate("Москва", "Екатеринбург", date(2026, 11, 5))
            .await
            .unwrap();
        assert_eq!(flights.len(), FLIGHTS_PER_QUERY);
    }

    #[tokio::test]
    async fn test_sorted_by_departure() {
        let gen = ScheduleGenerator::with_seed(42);
        let flights = gen
            .generate("Москва", "Сочи", date(2026, 11, 5))
            .await
            .unwrap();
        let parsed: Vec<NaiveDateTime> = flights
            .iter()
            .map(|f| NaiveDateTime::parse_from_str(&f.departure, "%H:%M %d-%m-%Y").unwrap())
            .collect();
        for pair in parsed.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[tokio::test]
    async fn test_deterministic_with_seed() {
        let a = ScheduleGenerator::with_seed(1)
            .generate("Москва", "Казань", date(2026, 3, 1))
            .await
            .unwrap();
        let b = ScheduleGenerator::with_seed(1)
            .generate("Москва", "Казань", date(2026, 3, 1))
            .await
            .unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_arrival_uses_route_hours() {
        let gen = ScheduleGenerator::with_seed(3);
        let flights = gen
            .generate("Санкт-Петербург", "Москва", date(2026, 6, 10))
            .await
            .unwrap();
        for f in &flights {
            assert_eq!(f.hours, 1);
            let dep = NaiveDateTime::parse_from_str(&f.departure, "%H:%M %d-%m-%Y").unwrap();
            let arr = NaiveDateTime::parse_from_str(&f.arrival, "%H:%M %d-%m-%Y").unwrap();
            assert_eq!(arr - dep, Duration::hours(1));
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_an_error() {
        let gen = ScheduleGenerator::with_seed(5);
        let err = gen
            .generate("Калининград", "Владивосток", date(2026, 6, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, AviabotError::Flights(_)));
    }
}
