use std::fmt;

use auth::IssuedRefreshToken;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::credential::errors::PasswordPolicyError;
use crate::credential::errors::UserIdError;
use crate::credential::errors::UsernameError;
use crate::credential::errors::ValidationErrors;

/// Stored credential record of a user.
///
/// `refresh_token` holds the single active refresh token together with its
/// expiry; both are present or both absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub username: Username,
    pub password_hash: String,
    pub refresh_token: Option<RefreshToken>,
}

impl UserRecord {
    /// Create a freshly registered user with no refresh token.
    pub fn new(username: Username, password_hash: String) -> Self {
        Self {
            id: UserId::new(),
            username,
            password_hash,
            refresh_token: None,
        }
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Non-empty, 3-50 characters, compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub const MIN_LENGTH: usize = 3;
    pub const MAX_LENGTH: usize = 50;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `Empty` - Username is empty
    /// * `InvalidLength` - Username is not 3-50 characters long
    pub fn new(username: String) -> Result<Self, UsernameError> {
        if username.is_empty() {
            return Err(UsernameError::Empty);
        }

        let length = username.chars().count();
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&length) {
            return Err(UsernameError::InvalidLength {
                min: Self::MIN_LENGTH,
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted for registration.
///
/// Only the policy is checked here; the value never leaves the service
/// unhashed. `Debug` does not print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `Empty` - Password is empty
    /// * `TooShort` - Password is shorter than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        if password.is_empty() {
            return Err(PasswordPolicyError::Empty);
        }

        if password.chars().count() < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Active refresh token of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Expired only when the expiry is strictly before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

impl From<IssuedRefreshToken> for RefreshToken {
    fn from(token: IssuedRefreshToken) -> Self {
        Self {
            value: token.value,
            expires_at: token.expires_at,
        }
    }
}

/// Validated registration input.
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub password: Password,
}

impl RegisterCommand {
    /// Validate raw registration input, collecting every field failure.
    ///
    /// # Errors
    /// * `ValidationErrors` - One or both fields are invalid
    pub fn new(username: String, password: String) -> Result<Self, ValidationErrors> {
        match (Username::new(username), Password::new(password)) {
            (Ok(username), Ok(password)) => Ok(Self { username, password }),
            (username, password) => Err(ValidationErrors {
                username: username.err(),
                password: password.err(),
            }),
        }
    }
}

/// Tokens handed to a client after a successful login or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResult {
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_in: i64,
}
