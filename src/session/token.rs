use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::types::SessionClaims;
use crate::shared::AppError;

/// Configuration for JWT token operations
#[derive(Clone)]
pub struct TokenConfig {
    secret: Arc<str>,
    pub expiration_hours: i64,
}

impl TokenConfig {
    pub fn new(secret: &str, expiration_hours: i64) -> Self {
        Self {
            secret: Arc::from(secret),
            expiration_hours,
        }
    }

    /// Creates a signed token for the given user
    #[instrument(skip(self, email))]
    pub fn create_token(&self, user_id: i64, email: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = Duration::try_hours(self.expiration_hours)
            .filter(|lifetime| *lifetime > Duration::zero())
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                debug!(
                    expiration_hours = self.expiration_hours,
                    "Token lifetime out of range"
                );
                AppError::JwtError("token lifetime out of range".to_string())
            })?
            .timestamp() as usize;

        debug!(
            expiration_hours = self.expiration_hours,
            exp_timestamp = exp,
            "Creating JWT token with expiration"
        );

        let claims = SessionClaims {
            sub: user_id,
            email: email.to_string(),
            exp,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Validates a JWT token and returns the claims if valid
    ///
    /// Only HS256 is accepted and expiry is enforced without leeway.
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, AppError> {
        debug!("Decoding and validating JWT token");

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let claims = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            AppError::JwtError(e.to_string())
        })?;

        // jsonwebtoken treats exp == now as valid; we don't
        if claims.exp as i64 <= Utc::now().timestamp() {
            debug!(exp = claims.exp, "JWT token has expired");
            return Err(AppError::JwtError("token is expired".to_string()));
        }

        debug!(
            user_id = claims.sub,
            email = %claims.email,
            exp = claims.exp,
            "JWT token decoded successfully"
        );
        Ok(claims)
    }
}
