use async_trait::async_trait;

use crate::credential::errors::LoginError;
use crate::credential::errors::RefreshError;
use crate::credential::errors::RegisterError;
use crate::credential::errors::UserStoreError;
use crate::credential::models::LoginResult;
use crate::credential::models::RefreshToken;
use crate::credential::models::UserId;
use crate::credential::models::UserRecord;

/// Port for credential lifecycle operations.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `username` - Raw username (3-50 characters)
    /// * `password` - Raw password (at least 6 characters)
    ///
    /// # Errors
    /// * `Validation` - Username or password violates the policy
    /// * `DuplicateUser` - Username is already taken
    /// * `Hashing` - Password hashing failed
    /// * `Storage` - Store operation failed
    async fn register(&self, username: String, password: String) -> Result<(), RegisterError>;

    /// Verify credentials and issue a fresh token pair.
    ///
    /// Any previously issued refresh token of the user stops working.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `Token` - Access token signing failed
    /// * `Storage` - Store operation failed
    async fn login(&self, username: String, password: String) -> Result<LoginResult, LoginError>;

    /// Exchange a refresh token for a fresh token pair.
    ///
    /// The presented refresh token is invalidated.
    ///
    /// # Errors
    /// * `InvalidOrExpiredToken` - Token unknown, expired or already rotated
    /// * `Token` - Access token signing failed
    /// * `Storage` - Store operation failed
    async fn refresh(&self, refresh_token: String) -> Result<LoginResult, RefreshError>;
}

/// Persistence operations for user credential records.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Retrieve user by exact (case-sensitive) username.
    ///
    /// # Returns
    /// Optional user record (None if not found)
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, UserStoreError>;

    /// Retrieve the user whose active refresh token equals `token`.
    ///
    /// # Returns
    /// Optional user record (None if no user holds the token)
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn find_by_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<UserRecord>, UserStoreError>;

    /// Insert or update a record by its id, atomically.
    ///
    /// # Errors
    /// * `DuplicateUsername` - Another record already uses the username
    /// * `Database` - Store operation failed
    async fn save(&self, record: &UserRecord) -> Result<(), UserStoreError>;

    /// Replace a user's refresh token only if `presented` is still the
    /// active one.
    ///
    /// Of several concurrent calls presenting the same token at most one
    /// returns `true`.
    ///
    /// # Returns
    /// Whether the swap happened
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn rotate_refresh_token(
        &self,
        user_id: &UserId,
        presented: &str,
        replacement: &RefreshToken,
    ) -> Result<bool, UserStoreError>;
}
