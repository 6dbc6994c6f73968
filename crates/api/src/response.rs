//! Shared response envelope types for API handlers.
//!
//! List endpoints use a `{ "data": ... }` envelope. Single-entity endpoints
//! whose shape is fixed by the frontend contract return their payload bare.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
