//! Shared types for the AviaBot workspace: the error taxonomy, the
//! incoming/outgoing message models, and text helpers the validation
//! rules are defined over.

pub mod error;
pub mod reply;
pub mod text;

pub use error::{AviabotError, AviabotResult};
pub use reply::{IncomingMessage, Reply, ReplyMarkup};
pub use text::title_case;
