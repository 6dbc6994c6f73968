//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the corresponding repository in `planform_db` and map
//! errors via [`AppError`](crate::error::AppError).

pub mod agency;
pub mod auth;
pub mod idea;
pub mod stage;
pub mod user;
