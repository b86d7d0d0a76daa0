//! Bearer authentication for the `/api` routes.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use studyplan_core::ids::UserId;
use studyplan_ports::error::AuthError;

use crate::error::ApiError;
use crate::state::AppState;

/// The caller, as resolved by the identity provider.
pub struct AuthUser(pub UserId);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::MissingCredential)?;
        match state.identity.resolve(token).await {
            Ok(user_id) => Ok(AuthUser(user_id)),
            Err(e) => {
                tracing::debug!(error = %e, "bearer token rejected");
                Err(e.into())
            }
        }
    }
}
