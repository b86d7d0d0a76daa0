use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("end time must be strictly after start time")]
    NonPositiveDuration,
    #[error("an allocation must last at least 10 minutes")]
    BelowMinimumDuration,
    #[error("invalid range: {0}")]
    InvalidRange(String),
    #[error("goal title must not be empty")]
    EmptyGoalTitle,
    #[error("allocation is already completed")]
    AlreadyCompleted,
    #[error("invalid id: {0}")]
    InvalidId(String),
}
