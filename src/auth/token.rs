//! Session token issuance and verification.
//!
//! Tokens are HS256-signed JWTs carrying the administrator's UUID, email and
//! an absolute expiry (`exp`, fractional seconds since the Unix epoch with
//! microsecond resolution).

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lifetime of a session token in seconds.
pub const SESSION_TTL_SECS: i64 = 3600;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

const MICROS_PER_SEC: i64 = 1_000_000;

/// Token verification errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// No bearer credential was presented.
    #[error("sign in to proceed")]
    NoCredential,

    /// The token could not be parsed or lacks the expected claims.
    #[error("malformed token")]
    MalformedToken,

    /// The token is past its expiry instant.
    #[error("token is expired")]
    ExpiredToken,

    /// The signature (or signing algorithm) does not match.
    #[error("invalid token signature")]
    InvalidSignature,

    /// Signing a new token failed.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionClaims {
    /// Administrator UUID.
    #[serde(rename = "adminUUID")]
    pub admin_uuid: Uuid,
    /// Administrator email.
    pub email: String,
    /// Expiry instant (Unix seconds, fractional).
    pub exp: f64,
}

/// Authenticated identity decoded from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Administrator UUID.
    pub admin_uuid: Uuid,
    /// Administrator email.
    pub email: String,
}

/// Issues and verifies session tokens with a process-wide secret.
///
/// The secret is fixed at construction and never re-read.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec from a symmetric secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Expiry is checked in verify_at so the boundary is exclusive
        validation.validate_exp = false;
        validation.leeway = 0;
        // jsonwebtoken only recognises integer `exp`; presence is enforced by SessionClaims
        validation.required_spec_claims = HashSet::new();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        SESSION_TTL_SECS
    }

    /// Issue a token valid for one hour from now.
    pub fn issue(&self, admin_uuid: Uuid, email: &str) -> Result<String, TokenError> {
        self.issue_at(admin_uuid, email, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// The issuance instant is recorded to the microsecond.
    pub fn issue_at(
        &self,
        admin_uuid: Uuid,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = SessionClaims {
            admin_uuid,
            email: email.to_string(),
            exp: micros_to_secs(now.timestamp_micros() + SESSION_TTL_SECS * MICROS_PER_SEC),
        };

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// Accepts the token only if the signature and algorithm match, the claim
    /// set is complete and well typed, and `now` is strictly before `exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
                _ => TokenError::MalformedToken,
            })?;

        let claims = data.claims;
        let exp_micros = secs_to_micros(claims.exp).ok_or(TokenError::MalformedToken)?;
        if now.timestamp_micros() >= exp_micros {
            return Err(TokenError::ExpiredToken);
        }

        Ok(Identity {
            admin_uuid: claims.admin_uuid,
            email: claims.email,
        })
    }
}

fn micros_to_secs(micros: i64) -> f64 {
    micros as f64 / MICROS_PER_SEC as f64
}

/// Convert a fractional `exp` back to whole microseconds.
///
/// Rounding recovers the exact value written by [`micros_to_secs`], since f64
/// spacing at current epoch values is well under half a microsecond.
fn secs_to_micros(secs: f64) -> Option<i64> {
    if !secs.is_finite() {
        return None;
    }
    let micros = (secs * MICROS_PER_SEC as f64).round();
    if micros < i64::MIN as f64 || micros > i64::MAX as f64 {
        return None;
    }
    Some(micros as i64)
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("ttl_secs", &SESSION_TTL_SECS)
            .finish_non_exhaustive()
    }
}

/// Extract the token from an `Authorization` header value.
///
/// A missing header, a scheme other than `Bearer`, or an empty token all
/// yield [`TokenError::NoCredential`].
pub fn extract_bearer(header: Option<&str>) -> Result<&str, TokenError> {
    let token = header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(TokenError::NoCredential)?;

    if token.is_empty() {
        return Err(TokenError::NoCredential);
    }
    Ok(token)
}
