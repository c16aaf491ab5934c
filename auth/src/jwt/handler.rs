use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use sha2::Digest;
use sha2::Sha256;

use super::claims::AccessClaims;
use super::errors::JwtError;

/// Clock skew tolerated on `exp` and `nbf`, in seconds.
pub const VALIDATION_LEEWAY_SECONDS: u64 = 0;

/// JWT token handler for encoding and decoding access tokens.
///
/// Uses HS256 (HMAC with SHA-256). The HMAC key is the SHA-256 digest of the
/// configured secret, so secrets of any length map to a 32-byte key.
/// Decoding checks signature, expiry, issuer and audience.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
}

impl JwtHandler {
    /// Create a new JWT handler.
    ///
    /// # Arguments
    /// * `secret` - Raw configured secret; hashed with SHA-256 to form the key
    /// * `issuer` - Issuer accepted when decoding
    /// * `audience` - Audience accepted when decoding
    pub fn new(secret: &[u8], issuer: &str, audience: &str) -> Self {
        let key = Sha256::digest(secret);
        let algorithm = Algorithm::HS256;

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = VALIDATION_LEEWAY_SECONDS;

        Self {
            encoding_key: EncodingKey::from_secret(&key),
            decoding_key: DecodingKey::from_secret(&key),
            algorithm,
            validation,
        }
    }

    /// Encode claims into a signed JWT.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &AccessClaims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT.
    ///
    /// # Errors
    /// * `TokenExpired` - `exp` is in the past, with no grace period
    /// * `InvalidToken` - Signature, issuer, audience or format is invalid
    pub fn decode(&self, token: &str) -> Result<AccessClaims, JwtError> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::InvalidToken(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::Utc;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn claims_expiring_in(minutes: i64) -> AccessClaims {
        let now = Utc::now();
        AccessClaims::for_user(
            "user123",
            "alice",
            "credential-service",
            "api-clients",
            now,
            now + Duration::minutes(minutes),
        )
    }

    #[test]
    fn test_encode_and_decode() {
        let handler = JwtHandler::new(SECRET, "credential-service", "api-clients");
        let claims = claims_expiring_in(15);

        let token = handler.encode(&claims).expect("Failed to encode token");
        assert!(!token.is_empty());

        let decoded = handler.decode(&token).expect("Failed to decode token");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_signing_key_is_hashed_secret() {
        let handler = JwtHandler::new(SECRET, "credential-service", "api-clients");
        let token = handler.encode(&claims_expiring_in(15)).unwrap();

        // A validator keyed with the raw secret must reject the token
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&["api-clients"]);
        let raw = decode::<AccessClaims>(&token, &DecodingKey::from_secret(SECRET), &validation);
        assert!(raw.is_err());

        let hashed = decode::<AccessClaims>(
            &token,
            &DecodingKey::from_secret(&Sha256::digest(SECRET)),
            &validation,
        );
        assert!(hashed.is_ok());
    }

    #[test]
    fn test_decode_invalid_token() {
        let handler = JwtHandler::new(SECRET, "credential-service", "api-clients");

        let result = handler.decode("invalid.token.here");
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let handler1 = JwtHandler::new(b"secret1", "credential-service", "api-clients");
        let handler2 = JwtHandler::new(b"secret2", "credential-service", "api-clients");

        let token = handler1.encode(&claims_expiring_in(15)).unwrap();

        assert!(handler2.decode(&token).is_err());
    }

    #[test]
    fn test_decode_wrong_issuer_or_audience() {
        let handler = JwtHandler::new(SECRET, "credential-service", "api-clients");
        let token = handler.encode(&claims_expiring_in(15)).unwrap();

        let other_issuer = JwtHandler::new(SECRET, "someone-else", "api-clients");
        assert!(matches!(
            other_issuer.decode(&token),
            Err(JwtError::InvalidToken(_))
        ));

        let other_audience = JwtHandler::new(SECRET, "credential-service", "other-clients");
        assert!(matches!(
            other_audience.decode(&token),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_decode_expired_token() {
        let handler = JwtHandler::new(SECRET, "credential-service", "api-clients");
        let token = handler.encode(&claims_expiring_in(-60)).unwrap();

        assert!(matches!(handler.decode(&token), Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_decode_rejects_token_just_past_expiry() {
        let handler = JwtHandler::new(SECRET, "credential-service", "api-clients");
        let now = Utc::now();
        let claims = AccessClaims::for_user(
            "user123",
            "alice",
            "credential-service",
            "api-clients",
            now - Duration::minutes(15),
            now - Duration::seconds(5),
        );
        let token = handler.encode(&claims).unwrap();

        assert!(matches!(handler.decode(&token), Err(JwtError::TokenExpired)));
    }
}
