use thiserror::Error;

/// Error type for password operations.
///
/// Verification never produces an error: a stored hash that cannot be
/// decoded simply does not verify.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Invalid key derivation parameters: {0}")]
    InvalidParams(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
