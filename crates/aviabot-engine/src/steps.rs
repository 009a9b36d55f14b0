//! Per-step validation predicates, resolved by exhaustive match over
//! [`Step`]. Predicates are pure; the matching valid/invalid handlers live
//! on the engine.

use aviabot_core::title_case;
use aviabot_flights::routes;
use aviabot_session::Step;
use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// Loose phone pattern: 3 digits, optional separator, 3 digits, optional
/// separator, 4 digits, optional separator, trailing optional digits.
#[allow(clippy::expect_used)]
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{3})\D?(\d{3})\D?(\d{4})\D?(\d*)$").expect("phone pattern is valid")
});

/// Whether `text` passes the predicate for `step`. `today` anchors the
/// date-acceptance window.
pub fn step_accepts(step: Step, text: &str, today: NaiveDate) -> bool {
    match step {
        Step::CityFrom | Step::CityTo => is_known_city(text),
        Step::FlightDate => date_in_window(text, today),
        Step::FlightChoice | Step::SeatCount => is_option_choice(text),
        Step::Comment => !text.is_empty(),
        Step::ConfirmSummary => is_confirmation(text),
        Step::PhoneNumber => is_phone_number(text),
    }
}

/// The title-cased input is a known city name.
pub fn is_known_city(text: &str) -> bool {
    routes::is_city(&title_case(text))
}

/// Parses as `DD-MM-YYYY` and lies within `[today, today + 365 days)`.
pub fn date_in_window(text: &str, today: NaiveDate) -> bool {
    match NaiveDate::parse_from_str(text, "%d-%m-%Y") {
        Ok(date) => date >= today && date < today + Duration::days(365),
        Err(_) => false,
    }
}

/// Exactly one of the digit strings "1".."5"; "0", "6", "01" and words
/// are all rejected.
pub fn is_option_choice(text: &str) -> bool {
    matches!(text, "1" | "2" | "3" | "4" | "5")
}

/// The confirmation token, case-insensitive.
pub fn is_confirmation(text: &str) -> bool {
    title_case(text) == "Да"
}

pub fn is_phone_number(text: &str) -> bool {
    PHONE_RE.is_match(text)
}
