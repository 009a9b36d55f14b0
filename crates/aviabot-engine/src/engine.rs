use crate::{steps, texts};
use aviabot_booking::{BookingRecord, BookingStore, TicketRenderer};
use aviabot_core::{text, title_case, AviabotError, AviabotResult, IncomingMessage, Reply};
use aviabot_flights::{routes, FlightGenerator, FLIGHTS_PER_QUERY};
use aviabot_session::{ConversationSession, SessionMap, Step, StepStore};
use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, info};

/// Conversational commands, matched case-insensitively and exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Ticket,
    Help,
    Cancel,
}

impl Command {
    pub fn parse(text: &str) -> Option<Command> {
        match text.to_lowercase().as_str() {
            "/start" => Some(Command::Start),
            "/ticket" => Some(Command::Ticket),
            "/help" => Some(Command::Help),
            "/cancel" => Some(Command::Cancel),
            _ => None,
        }
    }
}

/// What dispatch should do with the (possibly mutated) session copy.
enum Outcome {
    /// Write the session back; update the step label if the step changed.
    Persist,
    /// Discard the session and its step label.
    Abort,
    /// Booking committed; discard the session and its step label.
    Complete,
}

/// Drives one booking conversation per identity.
///
/// Every collaborator is injected, so tests run against in-memory stores
/// and a seeded RNG. `handle` performs one session read and at most one
/// write per message; a collaborator failure is returned as-is and leaves
/// the session at the last completed step.
pub struct Engine {
    sessions: Arc<dyn SessionMap>,
    steps: Arc<dyn StepStore>,
    bookings: Arc<dyn BookingStore>,
    flights: Arc<dyn FlightGenerator>,
    tickets: Arc<dyn TicketRenderer>,
    rng: Mutex<StdRng>,
}

impl Engine {
    pub fn new(
        sessions: Arc<dyn SessionMap>,
        steps: Arc<dyn StepStore>,
        bookings: Arc<dyn BookingStore>,
        flights: Arc<dyn FlightGenerator>,
        tickets: Arc<dyn TicketRenderer>,
    ) -> Self {
        Self {
            sessions,
            steps,
            bookings,
            flights,
            tickets,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Engine with a deterministic suggestion sampler, for tests.
    pub fn with_seed(
        sessions: Arc<dyn SessionMap>,
        steps: Arc<dyn StepStore>,
        bookings: Arc<dyn BookingStore>,
        flights: Arc<dyn FlightGenerator>,
        tickets: Arc<dyn TicketRenderer>,
        seed: u64,
    ) -> Self {
        Self {
            sessions,
            steps,
            bookings,
            flights,
            tickets,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Process one incoming message and return the replies to send.
    pub async fn handle(&self, msg: &IncomingMessage) -> AviabotResult<Vec<Reply>> {
        match Command::parse(&msg.text) {
            Some(Command::Start) => self.start_flow(msg, true).await,
            Some(Command::Ticket) => self.start_flow(msg, false).await,
            Some(Command::Help) => Ok(vec![Reply::text(texts::HELP)]),
            Some(Command::Cancel) => self.cancel(msg).await,
            None => self.dispatch(msg).await,
        }
    }

    /// `/start` and `/ticket`: reset any active session and begin at the
    /// departure-city step. `/start` additionally greets.
    async fn start_flow(&self, msg: &IncomingMessage, greet: bool) -> AviabotResult<Vec<Reply>> {
        let mut out = Vec::new();

        if self.sessions.get(&msg.identity).await?.is_some() {
            self.steps.delete(&msg.identity).await?;
            self.sessions.remove(&msg.identity).await?;
            debug!(identity = %msg.identity, "previous session dropped on restart");
        }

        if greet {
            info!(identity = %msg.identity, name = %msg.display_name, "user connected");
            out.push(Reply::plain(texts::greeting(&msg.display_name)));
            out.push(Reply::text(texts::GREETING_INTRO));
            out.push(Reply::text(texts::GREETING_COMMANDS));
        } else {
            debug!(identity = %msg.identity, "booking flow started");
        }

        self.steps
            .create(&msg.identity, &msg.display_name, Step::CityFrom.label())
            .await?;
        self.sessions
            .put(ConversationSession::new(&msg.identity, &msg.display_name))
            .await?;
        out.push(Reply::plain(texts::ASK_CITY_FROM));
        Ok(out)
    }

    /// `/cancel`: silent no-op without a session, acknowledgment otherwise.
    async fn cancel(&self, msg: &IncomingMessage) -> AviabotResult<Vec<Reply>> {
        if self.sessions.get(&msg.identity).await?.is_none() {
            return Ok(Vec::new());
        }
        debug!(identity = %msg.identity, "session cancelled");
        self.steps.delete(&msg.identity).await?;
        self.sessions.remove(&msg.identity).await?;
        Ok(vec![Reply::plain(texts::CANCELLED)])
    }

    /// Route free text through the current step's predicate and handlers.
    async fn dispatch(&self, msg: &IncomingMessage) -> AviabotResult<Vec<Reply>> {
        let Some(mut session) = self.sessions.get(&msg.identity).await? else {
            // Unhandled text outside a flow mirrors the help response.
            return Ok(vec![Reply::text(texts::HELP)]);
        };

        let today = Local::now().date_naive();
        let previous_step = session.step;
        let mut out = Vec::new();

        let outcome = if steps::step_accepts(session.step, &msg.text, today) {
            self.on_valid(&mut session, &msg.text, &mut out).await?
        } else {
            self.on_invalid(&mut session, &msg.text, &mut out)
        };

        match outcome {
            Outcome::Persist => {
                if session.step != previous_step {
                    self.steps
                        .update(&msg.identity, session.step.label())
                        .await?;
                }
                self.sessions.put(session).await?;
            }
            Outcome::Abort | Outcome::Complete => {
                self.steps.delete(&msg.identity).await?;
                self.sessions.remove(&msg.identity).await?;
            }
        }
        Ok(out)
    }

    async fn on_valid(
        &self,
        session: &mut ConversationSession,
        input: &str,
        out: &mut Vec<Reply>,
    ) -> AviabotResult<Outcome> {
        match session.step {
            Step::CityFrom => {
                session.city_from = Some(title_case(input));
                session.advance();
                debug!(?session, "departure city accepted");
                out.push(Reply::plain(texts::ASK_CITY_TO));
                Ok(Outcome::Persist)
            }
            Step::CityTo => {
                let city_to = title_case(input);
                if session.city_from.as_deref() == Some(city_to.as_str()) {
                    out.push(Reply::plain(texts::CITIES_MUST_DIFFER));
                    return Ok(Outcome::Abort);
                }
                let reachable = reachable_from(session.city_from.as_deref());
                if !reachable.contains(&city_to.as_str()) {
                    // A real city the carrier does not serve from the chosen
                    // departure city; same two-strike path as a typo.
                    return Ok(self.on_city_invalid(
                        input,
                        &mut session.city_to_retry,
                        texts::CONFIRM_CITY_TO,
                        texts::NO_FLIGHTS_TO,
                        texts::NO_FLIGHTS_TO_ABORT,
                        &reachable,
                        out,
                    ));
                }
                session.city_to = Some(city_to);
                session.advance();
                debug!(?session, "destination city accepted");
                out.push(Reply::plain(texts::ASK_DATE));
                Ok(Outcome::Persist)
            }
            Step::FlightDate => {
                self.accept_date(session, input, out).await?;
                Ok(Outcome::Persist)
            }
            Step::FlightChoice => {
                let index: usize = input
                    .parse()
                    .map_err(|_| AviabotError::Session(format!("bad flight index {input:?}")))?;
                session.chosen_flight = Some(index);
                let summary = session
                    .chosen_summary()
                    .ok_or_else(|| {
                        AviabotError::Session(format!("no cached summary for option {index}"))
                    })?
                    .to_string();
                session.advance();
                debug!(?session, "flight chosen");
                out.push(Reply::text(texts::chosen_option(index)));
                out.push(Reply::text(summary));
                out.push(Reply::text(texts::ASK_SEATS));
                Ok(Outcome::Persist)
            }
            Step::SeatCount => {
                let seats: u32 = input
                    .parse()
                    .map_err(|_| AviabotError::Session(format!("bad seat count {input:?}")))?;
                session.seat_count = Some(seats);
                session.advance();
                debug!(?session, "seat count accepted");
                out.push(Reply::plain(texts::ASK_COMMENT));
                Ok(Outcome::Persist)
            }
            Step::Comment => {
                session.comment = Some(input.to_string());
                session.advance();
                debug!(?session, "comment accepted");
                let summary = texts::order_summary(
                    session.chosen_summary().unwrap_or_default(),
                    session.seat_count.unwrap_or_default(),
                    session.comment.as_deref().unwrap_or_default(),
                );
                out.push(Reply::plain(summary));
                out.push(Reply::with_keyboard(
                    texts::ASK_CONFIRM,
                    vec![vec!["Да".to_string(), "Нет".to_string()]],
                ));
                Ok(Outcome::Persist)
            }
            Step::ConfirmSummary => {
                session.advance();
                out.push(Reply::plain(texts::ASK_PHONE));
                Ok(Outcome::Persist)
            }
            Step::PhoneNumber => {
                self.finalize(session, input, out).await?;
                Ok(Outcome::Complete)
            }
        }
    }

    fn on_invalid(
        &self,
        session: &mut ConversationSession,
        input: &str,
        out: &mut Vec<Reply>,
    ) -> Outcome {
        match session.step {
            Step::CityFrom => self.on_city_invalid(
                input,
                &mut session.city_from_retry,
                texts::CONFIRM_CITY_FROM,
                texts::NO_FLIGHTS_FROM,
                texts::NO_FLIGHTS_FROM_ABORT,
                &routes::cities(),
                out,
            ),
            Step::CityTo => {
                let reachable = reachable_from(session.city_from.as_deref());
                self.on_city_invalid(
                    input,
                    &mut session.city_to_retry,
                    texts::CONFIRM_CITY_TO,
                    texts::NO_FLIGHTS_TO,
                    texts::NO_FLIGHTS_TO_ABORT,
                    &reachable,
                    out,
                )
            }
            Step::FlightDate => {
                out.push(Reply::text(texts::DATE_REMINDER));
                Outcome::Persist
            }
            Step::FlightChoice => {
                out.push(Reply::text(texts::FLIGHT_RANGE_REMINDER));
                Outcome::Persist
            }
            Step::SeatCount => {
                out.push(Reply::text(texts::ASK_SEATS));
                Outcome::Persist
            }
            Step::Comment => {
                out.push(Reply::text(texts::ASK_COMMENT));
                Outcome::Persist
            }
            Step::ConfirmSummary => {
                // Anything but the confirmation token rejects the summary.
                out.push(Reply::plain(texts::RESTART_FOR_NEW_ORDER));
                Outcome::Abort
            }
            Step::PhoneNumber => {
                out.push(Reply::text(texts::PHONE_REMINDER));
                Outcome::Persist
            }
        }
    }

    /// Two-strike policy for the city steps: first miss offers either the
    /// near-match (input minus its last character) or up to five cities
    /// sampled from `pool`; a second miss while the flag is set aborts the
    /// session. The pool restricts both the near-match and the samples, so
    /// the destination step never suggests an unreachable city.
    #[allow(clippy::too_many_arguments)]
    fn on_city_invalid(
        &self,
        input: &str,
        retry_flag: &mut bool,
        confirm_text: &'static str,
        suggest_text: &'static str,
        abort_text: &'static str,
        pool: &[&'static str],
        out: &mut Vec<Reply>,
    ) -> Outcome {
        let near_match = text::strip_last_char(&title_case(input));
        if !*retry_flag && pool.contains(&near_match.as_str()) {
            *retry_flag = true;
            out.push(Reply::with_keyboard(confirm_text, vec![vec![near_match]]));
            Outcome::Persist
        } else if !*retry_flag {
            *retry_flag = true;
            let suggestions = self.sample_cities(pool);
            out.push(Reply::with_keyboard(suggest_text, keyboard_rows(&suggestions)));
            Outcome::Persist
        } else {
            out.push(Reply::plain(abort_text));
            Outcome::Abort
        }
    }

    /// Date accepted: generate the candidate flights, cache their rendered
    /// summaries, and advance. Generation failure propagates before the
    /// session copy is written back, so the step is unchanged on error.
    async fn accept_date(
        &self,
        session: &mut ConversationSession,
        input: &str,
        out: &mut Vec<Reply>,
    ) -> AviabotResult<()> {
        let date = NaiveDate::parse_from_str(input, "%d-%m-%Y")
            .map_err(|e| AviabotError::Session(format!("unparseable accepted date: {e}")))?;
        let city_from = session
            .city_from
            .clone()
            .ok_or_else(|| AviabotError::Session("no departure city on record".to_string()))?;
        let city_to = session
            .city_to
            .clone()
            .ok_or_else(|| AviabotError::Session("no destination city on record".to_string()))?;

        let flights = self.flights.generate(&city_from, &city_to, date).await?;

        session.flight_date = Some(input.to_string());
        session.flight_summaries = flights
            .iter()
            .map(|f| texts::flight_summary(&city_from, &city_to, &f.departure, &f.arrival, f.hours))
            .collect();
        session.flights = flights;
        session.advance();
        debug!(?session, "flight date accepted");

        let numbers: Vec<String> = (1..=FLIGHTS_PER_QUERY).map(|n| n.to_string()).collect();
        out.push(Reply::with_keyboard(
            texts::ASK_FLIGHT,
            keyboard_rows(&numbers),
        ));
        for (i, summary) in session.flight_summaries.iter().enumerate() {
            out.push(Reply::text(format!("{}) {summary}", i + 1)));
        }
        Ok(())
    }

    /// Phone accepted: commit the booking, render the ticket, and close the
    /// session. The booking is appended before the ticket is rendered, so
    /// resending the phone number after a render failure appends a second
    /// record; rendering always reads the latest record, so the retried
    /// ticket still matches the form the user filled in.
    async fn finalize(
        &self,
        session: &ConversationSession,
        phone: &str,
        out: &mut Vec<Reply>,
    ) -> AviabotResult<()> {
        let flight_summary = session
            .chosen_summary()
            .ok_or_else(|| AviabotError::Session("no chosen flight on record".to_string()))?
            .to_string();
        let record = BookingRecord {
            identity: session.identity.clone(),
            display_name: session.display_name.clone(),
            flight_summary: flight_summary.clone(),
            seat_count: session
                .seat_count
                .ok_or_else(|| AviabotError::Session("no seat count on record".to_string()))?,
            comment: session
                .comment
                .clone()
                .ok_or_else(|| AviabotError::Session("no comment on record".to_string()))?,
            phone_number: phone.to_string(),
        };

        info!(
            identity = %session.identity,
            name = %session.display_name,
            flight = %flight_summary,
            seats = record.seat_count,
            phone = %record.phone_number,
            "booking form completed"
        );

        self.bookings.append(record).await?;
        let ticket = self.tickets.render(&session.identity).await?;

        out.push(Reply::text(texts::thanks(phone)));
        out.push(Reply::text(texts::YOUR_TICKET));
        out.push(Reply::photo(String::new(), ticket));
        Ok(())
    }

    fn sample_cities(&self, pool: &[&'static str]) -> Vec<String> {
        let mut rng = self.rng.lock();
        pool.choose_multiple(&mut *rng, 5)
            .map(|&c| c.to_string())
            .collect()
    }
}

/// Suggestion pool for the destination step: cities with a route from the
/// chosen departure city, or every known city before one is chosen.
fn reachable_from(city_from: Option<&str>) -> Vec<&'static str> {
    match city_from {
        Some(from) => routes::destinations_from(from),
        None => routes::cities(),
    }
}

/// Lay choices out the way the bot always shows them: three per row.
fn keyboard_rows(items: &[String]) -> Vec<Vec<String>> {
    items.chunks(3).map(<[String]>::to_vec).collect()
}
