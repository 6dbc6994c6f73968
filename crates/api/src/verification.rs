//! Email-verification lookup used by the access gate.
//!
//! The gate asks one question -- is this user's email verified? -- through the
//! [`VerificationLookup`] trait. Two implementations exist:
//!
//! - [`HttpVerificationLookup`] calls the user-info endpoint, forwarding the
//!   caller's session cookie.
//! - [`DbVerificationLookup`] reads the flag straight from the users table.
//!
//! Callers bound every lookup with [`VerificationConfig::timeout`]; what happens
//! when a lookup fails is the caller's policy ([`VerificationConfig::fail_open`]).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::header::COOKIE;
use planform_core::types::DbId;
use planform_db::repositories::UserRepo;
use planform_db::DbPool;
use serde::Deserialize;

use crate::auth::cookie::SESSION_COOKIE;

/// Default lookup timeout in milliseconds.
const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 2000;

/// Configuration for the gate's verification lookup.
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// User-info endpoint. `None` selects the direct database lookup.
    pub user_info_url: Option<String>,
    /// Upper bound on one lookup.
    pub timeout_ms: u64,
    /// Let the request through when the lookup fails or times out.
    pub fail_open: bool,
}

impl VerificationConfig {
    /// Load verification lookup configuration from environment variables.
    ///
    /// | Env Var                          | Default |
    /// |----------------------------------|---------|
    /// | `USER_INFO_URL`                  | --      |
    /// | `VERIFICATION_LOOKUP_TIMEOUT_MS` | `2000`  |
    /// | `VERIFICATION_FAIL_OPEN`         | `false` |
    pub fn from_env() -> Self {
        let user_info_url = std::env::var("USER_INFO_URL")
            .ok()
            .filter(|s| !s.is_empty());

        let timeout_ms: u64 = std::env::var("VERIFICATION_LOOKUP_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_LOOKUP_TIMEOUT_MS.to_string())
            .parse()
            .expect("VERIFICATION_LOOKUP_TIMEOUT_MS must be a valid u64");

        let fail_open = std::env::var("VERIFICATION_FAIL_OPEN")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Self {
            user_info_url,
            timeout_ms,
            fail_open,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Error type for verification lookup failures.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The user-info endpoint returned a non-2xx status code.
    #[error("User-info endpoint returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("User {0} not found")]
    UserNotFound(DbId),
}

impl LookupError {
    /// The lookup says the session's user does not exist. The user-info
    /// endpoint answers 404 for a deleted user.
    pub fn is_unknown_user(&self) -> bool {
        matches!(self, LookupError::UserNotFound(_) | LookupError::HttpStatus(404))
    }
}

/// Answers whether a signed-in user has verified their email address.
#[async_trait]
pub trait VerificationLookup: Send + Sync {
    /// `session_token` is the caller's raw token, for implementations that
    /// authenticate upstream as the user.
    async fn is_verified(&self, user_id: DbId, session_token: &str) -> Result<bool, LookupError>;
}

/// Body of the user-info endpoint; only the flag is read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfoBody {
    is_verified: bool,
}

/// Looks the flag up over HTTP against the user-info endpoint.
pub struct HttpVerificationLookup {
    client: reqwest::Client,
    url: String,
}

impl HttpVerificationLookup {
    /// Create a lookup against `url` whose requests time out after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl VerificationLookup for HttpVerificationLookup {
    async fn is_verified(&self, user_id: DbId, session_token: &str) -> Result<bool, LookupError> {
        let response = self
            .client
            .get(&self.url)
            .header(COOKIE, format!("{SESSION_COOKIE}={session_token}"))
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!(user_id, status = %response.status(), "User-info lookup rejected");
            return Err(LookupError::HttpStatus(response.status().as_u16()));
        }

        let body: UserInfoBody = response.json().await?;
        Ok(body.is_verified)
    }
}

/// Reads the flag from the users table.
pub struct DbVerificationLookup {
    pool: DbPool,
}

impl DbVerificationLookup {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationLookup for DbVerificationLookup {
    async fn is_verified(&self, user_id: DbId, _session_token: &str) -> Result<bool, LookupError> {
        UserRepo::is_verified(&self.pool, user_id)
            .await?
            .ok_or(LookupError::UserNotFound(user_id))
    }
}

/// Pick the lookup implementation the configuration asks for.
pub fn from_config(
    config: &VerificationConfig,
    pool: DbPool,
) -> Result<Arc<dyn VerificationLookup>, reqwest::Error> {
    match &config.user_info_url {
        Some(url) => {
            tracing::info!(%url, "Verification lookup via user-info endpoint");
            Ok(Arc::new(HttpVerificationLookup::new(
                url.clone(),
                config.timeout(),
            )?))
        }
        None => {
            tracing::info!("Verification lookup via users table");
            Ok(Arc::new(DbVerificationLookup::new(pool)))
        }
    }
}
