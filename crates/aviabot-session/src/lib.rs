//! Conversation session model and the two stores around it: the keyed
//! in-flight session map the engine owns, and the observability-only
//! step-label store.

pub mod map;
pub mod session;
pub mod step_store;

pub use map::{InMemorySessionMap, SessionMap};
pub use session::{ConversationSession, Step};
pub use step_store::{InMemoryStepStore, SqliteStepStore, StepStore};
