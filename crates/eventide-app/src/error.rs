use eventide_rule::error::RuleError;
use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid occurrence #{index} of event {event:?}: {source}")]
    InvalidOccurrence {
        event: String,
        index: usize,
        #[source]
        source: RuleError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Calendar file is not valid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Usage error: {0}")]
    Usage(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
