//! HTTP-level integration tests for agency branding, services lookup by API
//! key, and API key rotation.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_with_cookie, session_cookie_for};
use planform_core::api_keys::generate_api_key;
use planform_db::models::agency::{Agency, CreateAgency, CreateAgencyService};
use planform_db::models::user::CreateUser;
use planform_db::repositories::{AgencyRepo, AgencyServiceRepo, UserRepo};
use sqlx::PgPool;

/// Create an agency owned by a fresh user; returns the agency, the owner id
/// and the agency's plaintext API key.
async fn create_agency(pool: &PgPool) -> (Agency, i64, String) {
    let owner = UserRepo::create(
        pool,
        &CreateUser {
            email: "studio@example.com".to_string(),
            name: "Studio".to_string(),
            password_hash: "unused".to_string(),
            verification_token_hash: None,
            remaining_runs: 0,
        },
    )
    .await
    .unwrap();

    let agency = AgencyRepo::create(
        pool,
        &CreateAgency {
            owner_user_id: Some(owner.id),
            name: "Brightside Studio".to_string(),
            primary_color: Some("#ff6600".to_string()),
            website_url: Some("https://brightside.example".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let key = generate_api_key();
    AgencyRepo::set_api_key(pool, agency.id, &key.hash, &key.prefix)
        .await
        .unwrap();

    for (name, is_active, sort_order) in [("Branding", true, 2), ("Landing page", true, 1), ("Retired", false, 0)] {
        AgencyServiceRepo::create(
            pool,
            agency.id,
            &CreateAgencyService {
                name: name.to_string(),
                description: None,
                price_cents: Some(150_000),
                is_active,
                sort_order,
            },
        )
        .await
        .unwrap();
    }

    (agency, owner.id, key.plaintext)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn agency_by_id_hides_key_material(pool: PgPool) {
    let (agency, _, _) = create_agency(&pool).await;
    let app = common::build_test_app(pool);

    let response = get(app.clone(), &format!("/api/agencies/{}", agency.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Brightside Studio");
    assert_eq!(json["primaryColor"], "#ff6600");
    assert!(json.get("apiKeyHash").is_none());
    assert!(json.get("apiKeyPrefix").is_none());
    assert!(json.get("apiKey").is_none());

    let response = get(app, "/api/agencies/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn services_by_api_key_lists_active_in_order(pool: PgPool) {
    let (_, _, api_key) = create_agency(&pool).await;
    let app = common::build_test_app(pool);

    let response = get(app, &format!("/api/services?apiKey={api_key}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Landing page", "Branding"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_api_key_is_404_not_empty_list(pool: PgPool) {
    create_agency(&pool).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/api/services?apiKey=definitely-not-a-real-key").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_api_key_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/services").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(app, "/api/services?apiKey=").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_rotates_api_key(pool: PgPool) {
    let (agency, owner_id, old_key) = create_agency(&pool).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/agencies/{}/api-key", agency.id);

    let response = post_with_cookie(app.clone(), &uri, &session_cookie_for(owner_id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let new_key = json["apiKey"].as_str().unwrap().to_string();
    assert_eq!(new_key.len(), 48);
    assert_eq!(json["prefix"], &new_key[..8]);

    let response = get(app.clone(), &format!("/api/services?apiKey={old_key}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, &format!("/api/services?apiKey={new_key}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rotation_requires_owner(pool: PgPool) {
    let (agency, owner_id, _) = create_agency(&pool).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/agencies/{}/api-key", agency.id);

    let response = common::post_json(app.clone(), &uri, serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_with_cookie(app.clone(), &uri, &session_cookie_for(owner_id + 1000)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_with_cookie(app, "/api/agencies/999999/api-key", &session_cookie_for(owner_id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
