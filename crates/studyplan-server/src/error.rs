use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use studyplan_app::error::AppError;
use studyplan_core::allocation::TimeSlot;
use studyplan_core::error::DomainError;
use studyplan_ports::error::{AuthError, PortError};

#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] AppError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    conflict: Option<TimeSlot>,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            AppError::Domain(e) => match e {
                DomainError::MalformedInput(_) | DomainError::InvalidId(_) => {
                    (StatusCode::BAD_REQUEST, "malformed_input")
                }
                DomainError::NonPositiveDuration => {
                    (StatusCode::BAD_REQUEST, "non_positive_duration")
                }
                DomainError::BelowMinimumDuration => {
                    (StatusCode::BAD_REQUEST, "below_minimum_duration")
                }
                DomainError::InvalidRange(_) => (StatusCode::BAD_REQUEST, "invalid_range"),
                DomainError::EmptyGoalTitle => (StatusCode::BAD_REQUEST, "empty_goal_title"),
                DomainError::AlreadyCompleted => (StatusCode::CONFLICT, "already_completed"),
            },
            AppError::Port(PortError::NotFound) | AppError::NotFound => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            AppError::Port(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_failure"),
            AppError::Auth(_) => (StatusCode::UNAUTHORIZED, "authentication_failed"),
            AppError::OverlapConflict(_) => (StatusCode::CONFLICT, "overlap_conflict"),
            AppError::UnknownGoal => (StatusCode::BAD_REQUEST, "unknown_goal"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let error = match &self.0 {
            AppError::Port(e) if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!(error = %e, "storage failure");
                "storage failure".to_string()
            }
            AppError::Domain(e) => e.to_string(),
            AppError::Auth(_) => "authentication failed".to_string(),
            other => other.to_string(),
        };
        let conflict = match &self.0 {
            AppError::OverlapConflict(slot) => Some(*slot),
            _ => None,
        };

        let body = Json(ErrorBody {
            error,
            code,
            conflict,
        });
        (status, body).into_response()
    }
}
