use chrono::Duration;
use chrono::Utc;

use crate::jwt::AccessClaims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::refresh;
use crate::refresh::IssuedRefreshToken;

/// Signed access token returned to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Serialized JWT
    pub token: String,

    /// Whole seconds of validity left, measured after signing
    pub expires_in: i64,
}

/// Mints access tokens and refresh tokens.
///
/// Holds the signing key, issuer, audience and access-token lifetime for
/// the process lifetime. Safe to share between tasks.
pub struct TokenIssuer {
    jwt_handler: JwtHandler,
    issuer: String,
    audience: String,
    access_token_ttl: Duration,
}

impl TokenIssuer {
    /// Create a new token issuer.
    ///
    /// # Arguments
    /// * `secret` - Raw signing secret (hashed with SHA-256 into the HMAC key)
    /// * `issuer` - Value of the `iss` claim
    /// * `audience` - Value of the `aud` claim
    /// * `access_token_ttl_minutes` - Access token lifetime, at least one minute
    ///
    /// # Errors
    /// * `InvalidLifetime` - Lifetime is not positive or does not fit a timestamp
    pub fn new(
        secret: &[u8],
        issuer: impl Into<String>,
        audience: impl Into<String>,
        access_token_ttl_minutes: i64,
    ) -> Result<Self, JwtError> {
        if access_token_ttl_minutes <= 0 {
            return Err(JwtError::InvalidLifetime(format!(
                "access token lifetime must be positive, got {} minutes",
                access_token_ttl_minutes
            )));
        }

        let access_token_ttl = Duration::try_minutes(access_token_ttl_minutes)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                JwtError::InvalidLifetime(format!(
                    "access token lifetime of {} minutes is out of range",
                    access_token_ttl_minutes
                ))
            })?;

        let issuer = issuer.into();
        let audience = audience.into();

        Ok(Self {
            jwt_handler: JwtHandler::new(secret, &issuer, &audience),
            issuer,
            audience,
            access_token_ttl,
        })
    }

    /// Issue a signed access token for a user.
    ///
    /// # Arguments
    /// * `user_id` - Subject identifier
    /// * `username` - Username claim
    ///
    /// # Returns
    /// Token and its remaining validity in seconds (never above the lifetime)
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    /// * `InvalidLifetime` - Expiry does not fit a timestamp
    pub fn issue_access_token(
        &self,
        user_id: impl ToString,
        username: impl ToString,
    ) -> Result<AccessToken, JwtError> {
        let issued_at = Utc::now();
        let expires_at = issued_at
            .checked_add_signed(self.access_token_ttl)
            .ok_or_else(|| JwtError::InvalidLifetime("access token expiry overflows".to_string()))?;

        let claims = AccessClaims::for_user(
            user_id,
            username,
            &self.issuer,
            &self.audience,
            issued_at,
            expires_at,
        );
        let token = self.jwt_handler.encode(&claims)?;

        let expires_in = (expires_at - Utc::now()).num_seconds().max(0);

        Ok(AccessToken { token, expires_in })
    }

    /// Issue a new opaque refresh token expiring in seven days.
    pub fn issue_refresh_token(&self) -> IssuedRefreshToken {
        refresh::generate(Utc::now())
    }

    /// Validate an access token and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Token lifetime has passed
    /// * `InvalidToken` - Signature, issuer, audience or format is invalid
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, JwtError> {
        self.jwt_handler.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            b"test_secret_key_at_least_32_bytes!",
            "credential-service",
            "api-clients",
            15,
        )
        .expect("Failed to build issuer")
    }

    #[test]
    fn test_issue_and_validate_access_token() {
        let issuer = issuer();

        let before = Utc::now().timestamp();
        let access = issuer
            .issue_access_token("user123", "alice")
            .expect("Failed to issue token");

        let claims = issuer
            .validate_access_token(&access.token)
            .expect("Token validation failed");

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.iss, "credential-service");
        assert_eq!(claims.aud, "api-clients");
        assert!(claims.exp >= before + 15 * 60);
        assert!(claims.exp <= Utc::now().timestamp() + 15 * 60);
    }

    #[test]
    fn test_expires_in_bounded_by_ttl() {
        let access = issuer().issue_access_token("user123", "alice").unwrap();

        assert!(access.expires_in <= 15 * 60);
        assert!(access.expires_in >= 15 * 60 - 5);
    }

    #[test]
    fn test_expired_access_token_rejected() {
        let issuer = issuer();
        let now = Utc::now();
        let claims = AccessClaims::for_user(
            "user123",
            "alice",
            "credential-service",
            "api-clients",
            now - Duration::minutes(20),
            now - Duration::minutes(5),
        );
        let token = issuer.jwt_handler.encode(&claims).unwrap();

        assert!(matches!(
            issuer.validate_access_token(&token),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_non_positive_lifetime_rejected() {
        for minutes in [0, -5, i64::MIN] {
            let result = TokenIssuer::new(b"secret", "credential-service", "api-clients", minutes);
            assert!(matches!(result, Err(JwtError::InvalidLifetime(_))));
        }
    }

    #[test]
    fn test_out_of_range_lifetime_rejected() {
        // Too large for a duration
        let result = TokenIssuer::new(b"secret", "credential-service", "api-clients", i64::MAX);
        assert!(matches!(result, Err(JwtError::InvalidLifetime(_))));

        // Fits a duration but overflows the expiry timestamp
        let result = TokenIssuer::new(
            b"secret",
            "credential-service",
            "api-clients",
            150_000_000_000,
        );
        assert!(matches!(result, Err(JwtError::InvalidLifetime(_))));
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let mut issuer = issuer();
        issuer.access_token_ttl = Duration::MAX;

        let result = issuer.issue_access_token("user123", "alice");

        assert!(matches!(result, Err(JwtError::InvalidLifetime(_))));
    }

    #[test]
    fn test_issue_refresh_token() {
        let issuer = issuer();
        let before = Utc::now();

        let first = issuer.issue_refresh_token();
        let second = issuer.issue_refresh_token();

        assert_ne!(first.value, second.value);
        assert!(first.expires_at >= before + Duration::days(7));
        assert!(first.expires_at <= Utc::now() + Duration::days(7));
    }

    #[test]
    fn test_validate_invalid_token() {
        let result = issuer().validate_access_token("invalid.token.here");
        assert!(result.is_err());
    }
}
