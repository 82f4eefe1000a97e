//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity matching the table row and the
//! `Deserialize` DTOs used for inserts and patches.

pub mod trip;
pub mod trip_user;
pub mod user;
