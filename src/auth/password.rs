//! Password hashing and verification.
//!
//! Uses Argon2id with a random salt per hash.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use rand_core::OsRng;
use thiserror::Error;

/// Password hashing errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Argon2 parameters were rejected.
    #[error("invalid hasher parameters: {0}")]
    Params(String),

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Create the Argon2id hasher.
///
/// Parameters:
/// - Memory cost: 64 MB (65536 KiB)
/// - Time cost: 3 iterations
/// - Parallelism: 4 lanes
fn create_argon2() -> Result<Argon2<'static>, PasswordError> {
    let m_cost = 65536;
    let t_cost = 3;
    let p_cost = 4;

    let params = Params::new(m_cost, t_cost, p_cost, None)
        .map_err(|e| PasswordError::Params(e.to_string()))?;
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

/// Hash a password using Argon2id.
///
/// Returns a PHC-formatted string that embeds the salt and parameters, so the
/// same input yields a different digest on every call.
///
/// # Examples
///
/// ```
/// use catalog::hash_password;
///
/// let hash = hash_password("secret123").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = create_argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored digest.
///
/// Returns `true` only when the password matches. A digest that cannot be
/// parsed is reported as a mismatch.
///
/// # Examples
///
/// ```
/// use catalog::{hash_password, verify_password};
///
/// let hash = hash_password("secret123").unwrap();
/// assert!(verify_password(&hash, "secret123"));
/// assert!(!verify_password(&hash, "wrong"));
/// ```
pub fn verify_password(digest: &str, password: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(digest) else {
        return false;
    };

    // Parameters come from the parsed digest, not from create_argon2()
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_phc_format() {
        let hash = hash_password("test_password_123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("$v=19$"));
    }

    #[test]
    fn test_hash_password_different_hashes() {
        let hash1 = hash_password("same_password").unwrap();
        let hash2 = hash_password("same_password").unwrap();

        // Different salts
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("secret123").unwrap();
        assert!(verify_password(&hash, "secret123"));
    }

    #[test]
    fn test_verify_password_wrong() {
        let hash = hash_password("secret123").unwrap();
        assert!(!verify_password(&hash, "secret124"));
        assert!(!verify_password(&hash, ""));
    }

    #[test]
    fn test_verify_password_invalid_digest() {
        assert!(!verify_password("not_a_valid_hash", "any_password"));
        assert!(!verify_password("", "any_password"));
    }

    #[test]
    fn test_hash_does_not_contain_plaintext() {
        let hash = hash_password("visible-secret").unwrap();
        assert!(!hash.contains("visible-secret"));
    }

    #[test]
    fn test_password_with_unicode() {
        let password = "pässwörd-日本語";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(&hash, password));
    }

    #[test]
    fn test_argon2_params() {
        let hash = hash_password("test_password").unwrap();

        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }
}
