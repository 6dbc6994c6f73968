use crate::auth::session_token::SessionConfig;
use crate::mailer::EmailConfig;
use crate::verification::VerificationConfig;

/// Run credits granted to a new account.
const DEFAULT_REMAINING_RUNS: i32 = 3;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins (embedding partner sites), parsed from
    /// comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory holding the built frontend, served for non-API paths.
    pub static_dir: String,
    /// Public base URL, used to build links in emails.
    pub app_base_url: String,
    /// Run credits granted at sign-up.
    pub default_remaining_runs: i32,
    /// Session token and cookie settings.
    pub session: SessionConfig,
    /// Access gate verification lookup settings.
    pub verification: VerificationConfig,
    /// SMTP settings; `None` disables outbound email.
    pub email: Option<EmailConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                  |
    /// |--------------------------|--------------------------|
    /// | `HOST`                   | `0.0.0.0`                |
    /// | `PORT`                   | `3000`                   |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                     |
    /// | `STATIC_DIR`             | `web/dist`               |
    /// | `APP_BASE_URL`           | `http://localhost:3000`  |
    /// | `DEFAULT_REMAINING_RUNS` | `3`                      |
    ///
    /// Session, verification and SMTP settings are documented on their own
    /// config types.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "web/dist".into());

        let app_base_url = std::env::var("APP_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let default_remaining_runs: i32 = std::env::var("DEFAULT_REMAINING_RUNS")
            .unwrap_or_else(|_| DEFAULT_REMAINING_RUNS.to_string())
            .parse()
            .expect("DEFAULT_REMAINING_RUNS must be a valid i32");
        assert!(
            default_remaining_runs >= 0,
            "DEFAULT_REMAINING_RUNS must not be negative"
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            static_dir,
            app_base_url,
            default_remaining_runs,
            session: SessionConfig::from_env(),
            verification: VerificationConfig::from_env(),
            email: EmailConfig::from_env(),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
