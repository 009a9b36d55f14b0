use aviabot_flights::FlightOption;
use serde::{Deserialize, Serialize};

/// One stage of the fixed-order booking form.
///
/// The order is fixed; the engine only ever advances to [`Step::next`] or
/// discards the session on an abort edge. "No session" and the terminal
/// state are represented by absence of a [`ConversationSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    CityFrom,
    CityTo,
    FlightDate,
    FlightChoice,
    SeatCount,
    Comment,
    ConfirmSummary,
    PhoneNumber,
}

impl Step {
    /// The step after this one, or `None` for the last step.
    pub fn next(self) -> Option<Step> {
        match self {
            Step::CityFrom => Some(Step::CityTo),
            Step::CityTo => Some(Step::FlightDate),
            Step::FlightDate => Some(Step::FlightChoice),
            Step::FlightChoice => Some(Step::SeatCount),
            Step::SeatCount => Some(Step::Comment),
            Step::Comment => Some(Step::ConfirmSummary),
            Step::ConfirmSummary => Some(Step::PhoneNumber),
            Step::PhoneNumber => None,
        }
    }

    /// Human-readable label written to the step store for observability.
    pub fn label(self) -> &'static str {
        match self {
            Step::CityFrom => "Город отправления",
            Step::CityTo => "Город назначения",
            Step::FlightDate => "Дата вылета",
            Step::FlightChoice => "Выбор рейса",
            Step::SeatCount => "Выбор количества мест",
            Step::Comment => "Комментарий",
            Step::ConfirmSummary => "Подтверждение данных",
            Step::PhoneNumber => "Ввод номера телефона",
        }
    }
}

/// In-progress booking form for one identity.
///
/// Created when the flow starts, mutated once per successfully processed
/// message, and destroyed on completion, cancellation, or an abort edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    pub identity: String,
    pub display_name: String,
    pub step: Step,
    pub city_from: Option<String>,
    pub city_to: Option<String>,
    /// Accepted date in `DD-MM-YYYY` form.
    pub flight_date: Option<String>,
    /// Generated once, immediately after the date is accepted; immutable
    /// afterwards. Exactly five entries, sorted by departure time.
    pub flights: Vec<FlightOption>,
    /// Rendered flight summaries cached per 1-based option index.
    pub flight_summaries: Vec<String>,
    /// 1-based index into `flights`.
    pub chosen_flight: Option<usize>,
    pub seat_count: Option<u32>,
    pub comment: Option<String>,
    /// Set after the first invalid departure-city input; a second invalid
    /// input while set aborts the session.
    pub city_from_retry: bool,
    /// Same, for the destination city.
    pub city_to_retry: bool,
}

impl ConversationSession {
    /// Fresh session at the first step.
    pub fn new(identity: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            display_name: display_name.into(),
            step: Step::CityFrom,
            city_from: None,
            city_to: None,
            flight_date: None,
            flights: Vec::new(),
            flight_summaries: Vec::new(),
            chosen_flight: None,
            seat_count: None,
            comment: None,
            city_from_retry: false,
            city_to_retry: false,
        }
    }

    /// Move to the next step of the form; a no-op on the last step, where
    /// the session is destroyed rather than advanced.
    pub fn advance(&mut self) {
        if let Some(next) = self.step.next() {
            self.step = next;
        }
    }

    /// The cached summary for the chosen flight, if both are set.
    pub fn chosen_summary(&self) -> Option<&str> {
        let index = self.chosen_flight?;
        self.flight_summaries.get(index - 1).map(String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        let mut step = Step::CityFrom;
        let mut seen = vec![step];
        while let Some(next) = step.next() {
            seen.push(next);
            step = next;
        }
        assert_eq!(
            seen,
            vec![
                Step::CityFrom,
                Step::CityTo,
                Step::FlightDate,
                Step::FlightChoice,
                Step::SeatCount,
                Step::Comment,
                Step::ConfirmSummary,
                Step::PhoneNumber,
            ]
        );
    }

    #[test]
    fn test_new_session_starts_clean() {
        let session = ConversationSession::new("42", "Анна");
        assert_eq!(session.step, Step::CityFrom);
        assert!(session.city_from.is_none());
        assert!(session.flights.is_empty());
        assert!(!session.city_from_retry);
    }

    #[test]
    fn test_advance_stops_at_the_last_step() {
        let mut session = ConversationSession::new("42", "Анна");
        for _ in 0..10 {
            session.advance();
        }
        assert_eq!(session.step, Step::PhoneNumber);
    }

    #[test]
    fn test_chosen_summary_indexing() {
        let mut session = ConversationSession::new("42", "Анна");
        session.flight_summaries = vec!["first".to_string(), "second".to_string()];
        assert_eq!(session.chosen_summary(), None);
        session.chosen_flight = Some(2);
        assert_eq!(session.chosen_summary(), Some("second"));
        session.chosen_flight = Some(9);
        assert_eq!(session.chosen_summary(), None);
    }
}
