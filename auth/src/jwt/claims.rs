use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an access token.
///
/// The set of claims is fixed so that every signed field is known at
/// compile time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Subject (user identifier)
    pub sub: String,

    /// Username of the subject
    pub username: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AccessClaims {
    /// Create claims for a user, valid from `issued_at` until `expires_at`.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `username` - Username of the user
    /// * `issuer` - Token issuer
    /// * `audience` - Intended token audience
    /// * `issued_at` - Issuance instant
    /// * `expires_at` - Expiration instant
    pub fn for_user(
        user_id: impl ToString,
        username: impl ToString,
        issuer: impl ToString,
        audience: impl ToString,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            username: username.to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }
}
