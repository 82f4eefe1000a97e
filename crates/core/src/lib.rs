//! Pure domain logic for the crew sign-up sheet: grid addressing, header and
//! attendance parsing, trip record construction and the membership state
//! machine. Nothing in this crate performs I/O.

pub mod activity;
pub mod attendance;
pub mod calendar;
pub mod column;
pub mod error;
pub mod grid;
pub mod header;
pub mod identity;
pub mod layout;
pub mod membership;
pub mod trip_builder;
pub mod types;
