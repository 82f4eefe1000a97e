//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod trip_repo;
pub mod trip_user_repo;
pub mod user_repo;

pub use trip_repo::TripRepo;
pub use trip_user_repo::TripUserRepo;
pub use user_repo::UserRepo;
