//! Authentication primitives: password hashing and session tokens.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, PasswordError};
pub use token::{
    extract_bearer, Identity, SessionClaims, TokenCodec, TokenError, SESSION_TTL_SECS,
};
