//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod agency_repo;
pub mod idea_repo;
pub mod stage_repo;
pub mod user_repo;

pub use agency_repo::{AgencyRepo, AgencyServiceRepo};
pub use idea_repo::IdeaRepo;
pub use stage_repo::StageRepo;
pub use user_repo::UserRepo;
