//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session_token`] -- signed, stateless session tokens with an explicit expiry.
//! - [`cookie`] -- reading and writing the `session` cookie.

pub mod cookie;
pub mod password;
pub mod session_token;
