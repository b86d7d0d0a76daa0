//! Bearer token validation for tokens minted by the hosted identity provider.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use studyplan_core::ids::UserId;
use studyplan_ports::error::AuthError;
use studyplan_ports::outbound::IdentityProvider;

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// Validates HS256 tokens signed with a shared secret and maps `sub` to a [`UserId`].
pub struct JwtIdentityProvider {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn resolve(&self, bearer: &str) -> Result<UserId, AuthError> {
        let token = bearer.trim();
        if token.is_empty() {
            return Err(AuthError::MissingCredential);
        }

        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| AuthError::InvalidCredential(e.to_string()))?;

        UserId::parse(&data.claims.sub)
            .map_err(|_| AuthError::InvalidCredential("subject is not a user id".into()))
    }
}
