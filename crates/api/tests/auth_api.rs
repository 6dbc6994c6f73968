//! HTTP-level integration tests for account endpoints and the user-info
//! lookup.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::LOCATION;
use axum::http::StatusCode;
use common::{
    body_json, get, get_with_cookie, post_json, post_with_cookie, session_cookie_for,
    session_from_response, set_cookies,
};
use planform_api::auth::password::hash_password;
use planform_api::mailer::EmailConfig;
use planform_api::verification::DbVerificationLookup;
use planform_core::hashing::sha256_hex;
use planform_db::models::user::{CreateUser, User};
use planform_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;
use tokio::net::TcpListener;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const PASSWORD: &str = "correct-horse-battery";

async fn create_user(pool: &PgPool, email: &str, verification_token: Option<&str>) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: "Test User".to_string(),
            password_hash: hash_password(PASSWORD).unwrap(),
            verification_token_hash: verification_token.map(|t| sha256_hex(t.as_bytes())),
            remaining_runs: 3,
        },
    )
    .await
    .expect("user creation should succeed")
}

// ---------------------------------------------------------------------------
// Sign-up
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn sign_up_creates_user_and_signs_in(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let body = json!({ "email": " New@Example.com ", "name": "Nova", "password": PASSWORD });
    let response = post_json(app.clone(), "/api/auth/sign-up", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_from_response(&response).expect("sign-up sets the session cookie");
    let json = body_json(response).await;
    assert_eq!(json["email"], "new@example.com");
    assert_eq!(json["name"], "Nova");
    assert_eq!(json["isVerified"], false);

    let user = UserRepo::find_by_email(&pool, "new@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.remaining_runs, 3);
    assert!(user.verification_token_hash.is_some());
    assert_ne!(user.password_hash, PASSWORD);

    let me = get_with_cookie(app, "/api/user", &cookie).await;
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(body_json(me).await["id"], user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sign_up_duplicate_email_conflicts(pool: PgPool) {
    create_user(&pool, "taken@example.com", None).await;
    let app = common::build_test_app(pool);

    let body = json!({ "email": "taken@example.com", "name": "Again", "password": PASSWORD });
    let response = post_json(app, "/api/auth/sign-up", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sign_up_does_not_wait_for_slow_smtp(pool: PgPool) {
    // A relay that accepts connections and never sends its greeting.
    let relay = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let smtp_port = relay.local_addr().unwrap().port();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = relay.accept().await {
            held.push(stream);
        }
    });

    let mut config = common::test_config();
    config.email = Some(EmailConfig {
        smtp_host: "127.0.0.1".to_string(),
        smtp_port,
        from_address: "noreply@planform.local".to_string(),
        smtp_user: None,
        smtp_password: None,
    });
    let lookup = Arc::new(DbVerificationLookup::new(pool.clone()));
    let app = common::build_test_app_with(pool.clone(), config, lookup);

    let body = json!({ "email": "slow@example.com", "name": "Slow", "password": PASSWORD });
    let response = tokio::time::timeout(
        Duration::from_secs(3),
        post_json(app, "/api/auth/sign-up", body),
    )
    .await
    .expect("sign-up must answer before the mail relay does");

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(UserRepo::find_by_email(&pool, "slow@example.com")
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sign_up_reports_invalid_fields(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "email": "not-an-email", "name": "Shorty", "password": "short" });
    let response = post_json(app, "/api/auth/sign-up", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["details"]["email"].is_array());
    assert!(json["details"]["password"].is_array());
    assert!(json["details"]["name"].is_null());
}

// ---------------------------------------------------------------------------
// Sign-in / sign-out
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn sign_in_sets_session_cookie(pool: PgPool) {
    let user = create_user(&pool, "member@example.com", None).await;
    let app = common::build_test_app(pool);

    let body = json!({ "email": "member@example.com", "password": PASSWORD });
    let response = post_json(app, "/api/auth/sign-in", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].contains("HttpOnly"));
    assert!(cookies[0].contains("Max-Age=86400"));
    assert_eq!(body_json(response).await["id"], user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sign_in_rejects_bad_credentials(pool: PgPool) {
    create_user(&pool, "member@example.com", None).await;
    let app = common::build_test_app(pool);

    let wrong_password = json!({ "email": "member@example.com", "password": "nope-nope-nope" });
    let response = post_json(app.clone(), "/api/auth/sign-in", wrong_password).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let unknown = json!({ "email": "ghost@example.com", "password": PASSWORD });
    let response = post_json(app, "/api/auth/sign-in", unknown).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sign_out_clears_cookie(pool: PgPool) {
    let user = create_user(&pool, "member@example.com", None).await;
    let app = common::build_test_app(pool);

    let response = post_with_cookie(app, "/api/auth/sign-out", &session_cookie_for(user.id)).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookies = set_cookies(&response);
    assert!(cookies[0].starts_with("session=;"));
    assert!(cookies[0].contains("Max-Age=0"));
}

// ---------------------------------------------------------------------------
// User info
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_info_requires_session(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/user").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_with_cookie(app, "/api/user", "session=forged.token.value").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_info_for_deleted_user_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_with_cookie(app, "/api/user", &session_cookie_for(987_654)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Email verification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn verify_email_unlocks_arena(pool: PgPool) {
    let user = create_user(&pool, "pending@example.com", Some("tok-123")).await;
    let app = common::build_test_app(pool);
    let cookie = session_cookie_for(user.id);

    let before = get_with_cookie(app.clone(), "/arena", &cookie).await;
    assert_eq!(before.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(before.headers().get(LOCATION).unwrap(), "/verify-email");

    let response = post_json(
        app.clone(),
        "/api/auth/verify-email",
        json!({ "token": "tok-123" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["isVerified"], true);

    let after = get_with_cookie(app, "/arena", &cookie).await;
    assert_ne!(after.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn verify_email_token_is_single_use(pool: PgPool) {
    create_user(&pool, "pending@example.com", Some("tok-once")).await;
    let app = common::build_test_app(pool);

    let body = json!({ "token": "tok-once" });
    let first = post_json(app.clone(), "/api/auth/verify-email", body.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(app.clone(), "/api/auth/verify-email", body).await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);

    let blank = post_json(app, "/api/auth/verify-email", json!({ "token": "  " })).await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}
