//! Credential and token primitives
//!
//! Provides the security-sensitive building blocks of the credential service:
//! - Password hashing (Argon2id, `base64(salt):base64(hash)` encoding)
//! - Access token signing and validation (HS256 JWT)
//! - Opaque refresh token generation
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new(1024, 1, 1).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("my_password", "not-a-hash"));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenIssuer;
//!
//! let issuer = TokenIssuer::new(b"secret", "credential-service", "api-clients", 15).unwrap();
//!
//! let access = issuer.issue_access_token("user123", "alice").unwrap();
//! assert!(access.expires_in <= 15 * 60);
//!
//! let claims = issuer.validate_access_token(&access.token).unwrap();
//! assert_eq!(claims.username, "alice");
//!
//! let refresh = issuer.issue_refresh_token();
//! assert!(!refresh.value.is_empty());
//! ```

pub mod issuer;
pub mod jwt;
pub mod password;
pub mod refresh;

// Re-export commonly used items
pub use issuer::AccessToken;
pub use issuer::TokenIssuer;
pub use jwt::AccessClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use refresh::IssuedRefreshToken;
