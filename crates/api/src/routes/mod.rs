pub mod agency;
pub mod auth;
pub mod health;
pub mod idea;

use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/sign-up                                    sign up (public)
/// /auth/sign-in                                    sign in (public)
/// /auth/sign-out                                   sign out (public)
/// /auth/verify-email                               consume verification token (public)
///
/// /user                                            current user info (requires auth)
///
/// /ideas                                           list, create (requires auth)
/// /ideas/{id}                                      get, delete (owner only)
/// /ideas/{idea_id}/stages/{stage_name}             persona stage transcript
/// /ideas/{idea_id}/stages/{stage_name}/messages    append message
/// /ideas/{idea_id}/stages/{stage_name}/complete    complete stage
///
/// /agencies/{id}                                   public agency branding
/// /agencies/{id}/api-key                           rotate API key (owner only)
/// /services?apiKey=...                             active services by API key
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Account routes.
        .nest("/auth", auth::router())
        // User-info lookup, also consumed by the access gate.
        .route("/user", get(handlers::user::me))
        // Ideas and their persona stages.
        .nest("/ideas", idea::router())
        // Agencies and the embeddable services listing.
        .nest("/agencies", agency::router())
        .route("/services", get(handlers::agency::list_services))
        // Unknown API paths answer with a JSON 404 instead of the app shell.
        .fallback(api_not_found)
}

async fn api_not_found() -> AppError {
    AppError::NotFound("No such API route".into())
}
