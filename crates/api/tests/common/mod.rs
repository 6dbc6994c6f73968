//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use planform_core::types::DbId;
use sqlx::PgPool;
use tower::ServiceExt;

use planform_api::auth::session_token::{SessionCodec, SessionConfig};
use planform_api::config::ServerConfig;
use planform_api::mailer::Mailer;
use planform_api::router::build_app_router;
use planform_api::state::AppState;
use planform_api::verification::{DbVerificationLookup, VerificationConfig, VerificationLookup};

/// Signing secret shared by the test app and [`session_cookie_for`].
pub const TEST_SECRET: &str = "integration-test-session-secret";

/// Build a test `ServerConfig` with safe defaults.
///
/// Cookies are issued without `Secure`, SMTP is disabled and the static
/// fallback serves `tests/fixtures/web`.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/web").to_string(),
        app_base_url: "http://localhost:3000".to_string(),
        default_remaining_runs: 3,
        session: SessionConfig {
            secret: Some(TEST_SECRET.to_string()),
            ttl_hours: 24,
            cookie_secure: false,
        },
        verification: VerificationConfig {
            user_info_url: None,
            timeout_ms: 200,
            fail_open: false,
        },
        email: None,
    }
}

/// Build the full application router backed by `pool`, with the database
/// verification lookup.
pub fn build_test_app(pool: PgPool) -> Router {
    let lookup = Arc::new(DbVerificationLookup::new(pool.clone()));
    build_test_app_with(pool, test_config(), lookup)
}

/// Build the full application router with an explicit config and
/// verification lookup. The mailer follows `config.email`.
pub fn build_test_app_with(
    pool: PgPool,
    config: ServerConfig,
    verification: Arc<dyn VerificationLookup>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionCodec::new(&config.session)),
        verification,
        mailer: Arc::new(Mailer::new(config.email.clone())),
    };
    build_app_router(state, &config)
}

/// A `Cookie` header value carrying a fresh session for `user_id`.
pub fn session_cookie_for(user_id: DbId) -> String {
    let codec = SessionCodec::new(&test_config().session);
    let (token, _) = codec.issue(user_id, Utc::now()).unwrap();
    format!("session={token}")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// All `Set-Cookie` header values on a response.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// The `session=...` pair from a response's `Set-Cookie`, usable as a
/// request `Cookie` header.
pub fn session_from_response(response: &Response<Body>) -> Option<String> {
    set_cookies(response)
        .into_iter()
        .find(|c| c.starts_with("session="))
        .and_then(|c| c.split(';').next().map(str::to_string))
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(cookie), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_with_cookie(
    app: Router,
    uri: &str,
    cookie: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(cookie), Some(body)).await
}

pub async fn post_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(cookie), None).await
}

pub async fn delete_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(cookie), None).await
}
