//! Stateless session tokens.
//!
//! A session is an HS256-signed JWT carrying the user id and an absolute
//! expiry. Nothing is stored server-side: a token is valid exactly when its
//! signature matches the process-wide secret and its expiry lies in the
//! future.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use planform_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// Default session lifetime in hours; each refreshed GET slides it forward.
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Configuration for session signing and the session cookie.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 signing secret. `None` leaves the codec unable to sign or
    /// verify anything.
    pub secret: Option<String>,
    /// Session lifetime in hours.
    pub ttl_hours: i64,
    /// Whether the cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var             | Required | Default |
    /// |---------------------|----------|---------|
    /// | `SESSION_SECRET`    | no*      | --      |
    /// | `SESSION_TTL_HOURS` | no       | `24`    |
    /// | `COOKIE_SECURE`     | no       | `true`  |
    ///
    /// *Without a secret every sign/verify call fails with
    /// [`TokenError::MissingSecret`].
    pub fn from_env() -> Self {
        let secret = std::env::var("SESSION_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        let ttl_hours: i64 = std::env::var("SESSION_TTL_HOURS")
            .unwrap_or_else(|_| DEFAULT_SESSION_TTL_HOURS.to_string())
            .parse()
            .expect("SESSION_TTL_HOURS must be a valid i64");

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        Self {
            secret,
            ttl_hours,
            cookie_secure,
        }
    }
}

/// The decoded content of a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPayload {
    pub user_id: DbId,
    /// Absolute expiry, whole seconds.
    pub expires_at: Timestamp,
}

impl SessionPayload {
    /// Build a payload. The expiry is truncated to whole seconds, the
    /// precision the token carries.
    pub fn new(user_id: DbId, expires_at: Timestamp) -> Self {
        Self {
            user_id,
            expires_at: expires_at.trunc_subsecs(0),
        }
    }
}

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject -- the user's internal database id.
    sub: DbId,
    /// Expiration time (UTC Unix timestamp).
    exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    iat: i64,
}

/// Errors from signing or verifying a session token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Session secret is not configured")]
    MissingSecret,

    #[error("Session token is invalid")]
    Invalid,

    #[error("Session token has expired")]
    Expired,

    #[error("Failed to encode session token: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Signs and verifies session tokens.
pub struct SessionCodec {
    keys: Option<Keys>,
    ttl: Duration,
}

impl SessionCodec {
    pub fn new(config: &SessionConfig) -> Self {
        let keys = config
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|secret| Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            });

        Self {
            keys,
            ttl: Duration::hours(config.ttl_hours),
        }
    }

    /// Session lifetime applied by [`issue`](Self::issue).
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign `payload` into a compact token.
    pub fn sign(&self, payload: &SessionPayload) -> Result<String, TokenError> {
        let keys = self.keys.as_ref().ok_or(TokenError::MissingSecret)?;

        let claims = Claims {
            sub: payload.user_id,
            exp: payload.expires_at.timestamp(),
            iat: Utc::now().timestamp(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &keys.encoding,
        )?)
    }

    /// Sign a fresh token for `user_id` expiring one TTL after `now`.
    pub fn issue(
        &self,
        user_id: DbId,
        now: DateTime<Utc>,
    ) -> Result<(String, SessionPayload), TokenError> {
        let payload = SessionPayload::new(user_id, now + self.ttl);
        let token = self.sign(&payload)?;
        Ok((token, payload))
    }

    /// Verify a token and return its payload.
    ///
    /// The expiry is checked before the signature, so a token whose expiry
    /// has passed reports [`TokenError::Expired`] whether or not its signature
    /// is genuine.
    pub fn verify(&self, token: &str) -> Result<SessionPayload, TokenError> {
        let keys = self.keys.as_ref().ok_or(TokenError::MissingSecret)?;

        let mut unverified = Validation::new(Algorithm::HS256);
        unverified.insecure_disable_signature_validation();
        unverified.validate_exp = false;
        let claims = decode::<Claims>(token, &keys.decoding, &unverified)
            .map_err(|_| TokenError::Invalid)?
            .claims;

        if claims.exp < Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        let mut strict = Validation::new(Algorithm::HS256);
        strict.leeway = 0;
        let claims = decode::<Claims>(token, &keys.decoding, &strict)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?
            .claims;

        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(TokenError::Invalid)?;
        Ok(SessionPayload {
            user_id: claims.sub,
            expires_at,
        })
    }
}
