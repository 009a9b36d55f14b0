//! The conversation engine: command routing, the step transition table,
//! session lifecycle, and booking finalization.

pub mod engine;
pub mod steps;
pub mod texts;

pub use engine::{Command, Engine};
