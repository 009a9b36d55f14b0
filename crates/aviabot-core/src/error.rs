use thiserror::Error;

/// Convenience alias used across the workspace.
pub type AviabotResult<T> = Result<T, AviabotError>;

/// Error taxonomy for the bot, one variant per subsystem.
#[derive(Error, Debug)]
pub enum AviabotError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Flights error: {0}")]
    Flights(String),

    #[error("Ticket error: {0}")]
    Ticket(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
