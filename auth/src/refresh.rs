use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;

/// Bytes of OS randomness in a refresh token.
pub const REFRESH_TOKEN_BYTES: usize = 64;

/// Refresh token lifetime in days.
pub const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 7;

/// Opaque refresh token with its absolute expiry.
///
/// The value carries no user data; it is bound to a user only by the
/// mapping kept in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedRefreshToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

/// Generate a new refresh token expiring [`REFRESH_TOKEN_LIFETIME_DAYS`]
/// after `now`.
pub fn generate(now: DateTime<Utc>) -> IssuedRefreshToken {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);

    IssuedRefreshToken {
        value: STANDARD.encode(bytes),
        expires_at: now + Duration::days(REFRESH_TOKEN_LIFETIME_DAYS),
    }
}
