//! Domain types and rules for Planform.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` and `api`
//! crates build on these types and rules.

pub mod api_keys;
pub mod error;
pub mod hashing;
pub mod idea;
pub mod persona;
pub mod route_access;
pub mod stage;
pub mod types;
