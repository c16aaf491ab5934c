use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;

use super::errors::PasswordError;

/// Salt size in bytes. Matches the minimum salt size of the Argon2id
/// implementation that produced the existing stored hashes.
pub const SALT_LENGTH: usize = 16;

/// Derived hash size in bytes for newly created hashes.
pub const HASH_LENGTH: usize = 32;

const SEPARATOR: char = ':';

/// Password hashing implementation.
///
/// Derives Argon2id hashes with cost parameters fixed at construction and
/// encodes them as `base64(salt):base64(hash)`. The cost parameters are not
/// part of the encoded string, so every hash in a store must have been
/// produced with the same parameters.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a password hasher with the given Argon2id cost parameters.
    ///
    /// # Arguments
    /// * `memory_kib` - Memory cost in KiB
    /// * `iterations` - Number of passes over memory (at least 1)
    /// * `parallelism` - Degree of parallelism (at least 1)
    ///
    /// # Errors
    /// * `InvalidParams` - Argon2 rejected the parameter combination
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        Ok(Self { params })
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Encoded hash in `base64(salt):base64(hash)` form
    ///
    /// # Errors
    /// * `HashingFailed` - Key derivation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt = [0u8; SALT_LENGTH];
        OsRng.fill_bytes(&mut salt);

        let mut hash = [0u8; HASH_LENGTH];
        self.argon2()
            .hash_password_into(password.as_bytes(), &salt, &mut hash)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        Ok(format!(
            "{}{}{}",
            STANDARD.encode(salt),
            SEPARATOR,
            STANDARD.encode(hash)
        ))
    }

    /// Verify a password against a stored encoded hash.
    ///
    /// Fails closed: an empty, malformed or undecodable `stored` value
    /// returns `false`. The derived output has the length of the stored
    /// hash and is compared in constant time.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored` - Encoded hash produced by [`PasswordHasher::hash`]
    ///
    /// # Returns
    /// True if password matches, false otherwise
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let Some((salt, expected)) = decode(stored) else {
            return false;
        };

        let mut computed = vec![0u8; expected.len()];
        if self
            .argon2()
            .hash_password_into(password.as_bytes(), &salt, &mut computed)
            .is_err()
        {
            return false;
        }

        computed.as_slice().ct_eq(expected.as_slice()).into()
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

fn decode(stored: &str) -> Option<(Vec<u8>, Vec<u8>)> {
    if stored.is_empty() {
        return None;
    }

    let mut parts = stored.split(SEPARATOR);
    let (salt, hash) = match (parts.next(), parts.next(), parts.next()) {
        (Some(salt), Some(hash), None) => (salt, hash),
        _ => return None,
    };

    let salt = STANDARD.decode(salt).ok()?;
    let hash = STANDARD.decode(hash).ok()?;
    if hash.is_empty() {
        return None;
    }

    Some((salt, hash))
}
