//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row, plus the create DTOs used by the repositories.

pub mod agency;
pub mod idea;
pub mod stage;
pub mod user;
