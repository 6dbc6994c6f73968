//! Route definitions for the `/agencies` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::agency;
use crate::state::AppState;

/// Routes mounted at `/agencies`.
///
/// ```text
/// GET  /{id}          -> get_by_id
/// POST /{id}/api-key  -> rotate_api_key
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(agency::get_by_id))
        .route("/{id}/api-key", post(agency::rotate_api_key))
}
