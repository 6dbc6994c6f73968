use std::sync::Arc;

use crate::auth::session_token::SessionCodec;
use crate::config::ServerConfig;
use crate::mailer::Mailer;
use crate::verification::VerificationLookup;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: planform_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Session token signer/verifier built from `config.session`.
    pub sessions: Arc<SessionCodec>,
    /// Email verification lookup consulted by the access gate.
    pub verification: Arc<dyn VerificationLookup>,
    /// Outbound account email.
    pub mailer: Arc<Mailer>,
}
