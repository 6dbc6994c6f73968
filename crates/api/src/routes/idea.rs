//! Route definitions for the `/ideas` resource.
//!
//! Also nests persona stage routes under `/ideas/{idea_id}/stages/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{idea, stage};
use crate::state::AppState;

/// Routes mounted at `/ideas`.
///
/// ```text
/// GET    /                                            -> list
/// POST   /                                            -> create
/// GET    /{id}                                        -> get_by_id
/// DELETE /{id}                                        -> delete
///
/// GET    /{idea_id}/stages/{stage_name}               -> stage::get
/// POST   /{idea_id}/stages/{stage_name}/messages      -> stage::append_message
/// POST   /{idea_id}/stages/{stage_name}/complete      -> stage::complete
/// ```
pub fn router() -> Router<AppState> {
    let stage_routes = Router::new()
        .route("/{stage_name}", get(stage::get))
        .route("/{stage_name}/messages", post(stage::append_message))
        .route("/{stage_name}/complete", post(stage::complete));

    Router::new()
        .route("/", get(idea::list).post(idea::create))
        .route("/{id}", get(idea::get_by_id).delete(idea::delete))
        .nest("/{idea_id}/stages", stage_routes)
}
