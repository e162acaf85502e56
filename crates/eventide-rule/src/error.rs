use thiserror::Error;

/// Invariants an occurrence rule must satisfy.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("End must be after start")]
    EndNotAfterStart,

    #[error(
        "Repeat interval required: select a repeat interval, or remove the 'repeat until' date"
    )]
    RepeatIntervalRequired,

    #[error("'Repeat until' cannot be before the first occurrence")]
    RepeatUntilBeforeStart,
}

/// Rule-level errors
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Validation error: {0}")]
    Invalid(#[from] RuleViolation),

    #[error("Recurrence error: {0}")]
    Recurrence(String),
}

impl RuleError {
    /// The violated invariant, if this is a validation failure.
    #[must_use]
    pub fn violation(&self) -> Option<RuleViolation> {
        match self {
            Self::Invalid(violation) => Some(*violation),
            Self::Recurrence(_) => None,
        }
    }
}

pub type RuleResult<T> = std::result::Result<T, RuleError>;
