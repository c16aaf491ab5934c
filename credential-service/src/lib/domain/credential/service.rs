use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenIssuer;
use chrono::Utc;

use crate::credential::errors::LoginError;
use crate::credential::errors::RefreshError;
use crate::credential::errors::RegisterError;
use crate::credential::models::LoginResult;
use crate::credential::models::RefreshToken;
use crate::credential::models::RegisterCommand;
use crate::credential::models::UserRecord;
use crate::credential::ports::CredentialServicePort;
use crate::credential::ports::UserStore;

/// Well-formed hash that matches no password. Verified against when the
/// username is unknown so both login failures cost one key derivation.
const DECOY_PASSWORD_HASH: &str =
    "AAAAAAAAAAAAAAAAAAAAAA==:AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

/// Domain service implementation for the credential lifecycle.
///
/// Concrete implementation of CredentialServicePort with dependency injection.
/// Key derivation runs on the blocking thread pool.
pub struct CredentialService<US>
where
    US: UserStore,
{
    store: Arc<US>,
    password_hasher: Arc<PasswordHasher>,
    token_issuer: Arc<TokenIssuer>,
}

impl<US> CredentialService<US>
where
    US: UserStore,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - User record persistence implementation
    /// * `password_hasher` - Hasher configured with the Argon2id cost parameters
    /// * `token_issuer` - Issuer configured with the signing secret
    pub fn new(
        store: Arc<US>,
        password_hasher: Arc<PasswordHasher>,
        token_issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            store,
            password_hasher,
            token_issuer,
        }
    }

    async fn verify_password(&self, password: String, stored: String) -> Result<bool, String> {
        let hasher = Arc::clone(&self.password_hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl<US> CredentialServicePort for CredentialService<US>
where
    US: UserStore,
{
    async fn register(&self, username: String, password: String) -> Result<(), RegisterError> {
        let command = RegisterCommand::new(username, password)?;

        if self
            .store
            .find_by_username(command.username.as_str())
            .await?
            .is_some()
        {
            tracing::warn!(username = %command.username, "Registration rejected: username taken");
            return Err(RegisterError::DuplicateUser(command.username.to_string()));
        }

        let hasher = Arc::clone(&self.password_hasher);
        let password = command.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|e| RegisterError::Internal(e.to_string()))??;

        let record = UserRecord::new(command.username, password_hash);
        self.store.save(&record).await?;

        tracing::info!(user_id = %record.id, username = %record.username, "User registered");

        Ok(())
    }

    async fn login(&self, username: String, password: String) -> Result<LoginResult, LoginError> {
        let user = self.store.find_by_username(&username).await?;

        let stored_hash = user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| DECOY_PASSWORD_HASH.to_string());
        let verified = self
            .verify_password(password, stored_hash)
            .await
            .map_err(LoginError::Internal)?;

        let mut user = match user {
            Some(user) if verified => user,
            _ => {
                tracing::warn!(username = %username, "Login failed: invalid credentials");
                return Err(LoginError::InvalidCredentials);
            }
        };

        let refresh_token = RefreshToken::from(self.token_issuer.issue_refresh_token());
        let access_token = self
            .token_issuer
            .issue_access_token(user.id, user.username.as_str())?;

        user.refresh_token = Some(refresh_token.clone());
        self.store.save(&user).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginResult {
            username: user.username.to_string(),
            access_token: access_token.token,
            refresh_token: refresh_token.value,
            access_token_expires_in: access_token.expires_in,
        })
    }

    async fn refresh(&self, refresh_token: String) -> Result<LoginResult, RefreshError> {
        let user = self
            .store
            .find_by_refresh_token(&refresh_token)
            .await?
            .ok_or(RefreshError::InvalidOrExpiredToken)?;

        let now = Utc::now();
        let is_active = user
            .refresh_token
            .as_ref()
            .is_some_and(|token| token.value == refresh_token && !token.is_expired(now));
        if !is_active {
            tracing::warn!(user_id = %user.id, "Refresh rejected: token expired");
            return Err(RefreshError::InvalidOrExpiredToken);
        }

        let replacement = RefreshToken::from(self.token_issuer.issue_refresh_token());
        let access_token = self
            .token_issuer
            .issue_access_token(user.id, user.username.as_str())?;

        let rotated = self
            .store
            .rotate_refresh_token(&user.id, &refresh_token, &replacement)
            .await?;
        if !rotated {
            tracing::warn!(user_id = %user.id, "Refresh rejected: token already rotated");
            return Err(RefreshError::InvalidOrExpiredToken);
        }

        tracing::info!(user_id = %user.id, "Refresh token rotated");

        Ok(LoginResult {
            username: user.username.to_string(),
            access_token: access_token.token,
            refresh_token: replacement.value,
            access_token_expires_in: access_token.expires_in,
        })
    }
}
