use studyplan_core::allocation::TimeSlot;
use studyplan_core::error::DomainError;
use studyplan_ports::error::{AuthError, PortError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("port error: {0}")]
    Port(#[from] PortError),
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
    #[error(
        "time slot overlaps an existing allocation ({} - {} UTC)",
        .0.start().format("%Y-%m-%d %H:%M"),
        .0.end().format("%H:%M")
    )]
    OverlapConflict(TimeSlot),
    #[error("goal not found")]
    UnknownGoal,
    #[error("allocation not found")]
    NotFound,
    #[error("allocation belongs to another user")]
    Forbidden,
}
