use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::models::{Credentials, NewUser, RegisterRequest, UserResponse};
use super::password::hash_password;
use crate::session::{LoginResponse, TokenConfig};
use crate::shared::AppError;
use crate::store::Store;

/// Service for registration and login
pub struct UserService {
    store: Arc<dyn Store>,
    token_config: TokenConfig,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, token_config: TokenConfig) -> Self {
        Self {
            store,
            token_config,
        }
    }

    /// Validates, hashes the password and stores the user
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, AppError> {
        crate::validation::validate(&request)?;

        let new_user = NewUser {
            username: request.username,
            email: request.email,
            password_hash: hash_password(&request.password).await?,
        };
        let user = self.store.create_user(&new_user).await?;

        info!(user_id = user.id, "User registered");
        Ok(user.into())
    }

    /// Exchanges valid credentials for a signed token.
    ///
    /// Unknown email and wrong password produce the same error.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: Credentials) -> Result<LoginResponse, AppError> {
        let user = self.store.get_user(&credentials).await?.ok_or_else(|| {
            warn!("Login rejected");
            AppError::InvalidCredentials
        })?;

        let token = self.token_config.create_token(user.id, &user.email)?;

        info!(user_id = user.id, "User logged in");
        Ok(LoginResponse { token })
    }
}
