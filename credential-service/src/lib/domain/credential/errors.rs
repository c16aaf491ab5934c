use auth::JwtError;
use auth::PasswordError;
use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username is required")]
    Empty,

    #[error("Username must be {min}-{max} characters, got {actual}")]
    InvalidLength {
        min: usize,
        max: usize,
        actual: usize,
    },
}

/// Error for Password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password is required")]
    Empty,

    #[error("Password must be at least {min} characters")]
    TooShort { min: usize },
}

/// Field-level validation failures of a registration request.
///
/// Every failing field is reported, not just the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", self.messages().join("; "))]
pub struct ValidationErrors {
    pub username: Option<UsernameError>,
    pub password: Option<PasswordPolicyError>,
}

impl ValidationErrors {
    /// Human-readable messages, one per failing field.
    pub fn messages(&self) -> Vec<String> {
        let username = self.username.as_ref().map(ToString::to_string);
        let password = self.password.as_ref().map(ToString::to_string);
        username.into_iter().chain(password).collect()
    }
}

/// Errors reported by a user store.
#[derive(Debug, Clone, Error)]
pub enum UserStoreError {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Stored user record is invalid: {0}")]
    CorruptRecord(String),

    #[error("Database error: {0}")]
    Database(String),
}

#[derive(Debug, Clone, Error)]
pub enum RegisterError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("User already exists: {0}")]
    DuplicateUser(String),

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] PasswordError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Storage(UserStoreError),
}

impl From<UserStoreError> for RegisterError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::DuplicateUsername(username) => RegisterError::DuplicateUser(username),
            other => RegisterError::Storage(other),
        }
    }
}

/// Login failures. Unknown usernames and wrong passwords share
/// `InvalidCredentials`.
#[derive(Debug, Clone, Error)]
pub enum LoginError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Token generation failed: {0}")]
    Token(#[from] JwtError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Storage(#[from] UserStoreError),
}

/// Refresh failures. Unknown and expired refresh tokens share
/// `InvalidOrExpiredToken`.
#[derive(Debug, Clone, Error)]
pub enum RefreshError {
    #[error("Invalid or expired refresh token")]
    InvalidOrExpiredToken,

    #[error("Token generation failed: {0}")]
    Token(#[from] JwtError),

    #[error(transparent)]
    Storage(#[from] UserStoreError),
}
