//! Spreadsheet access for the crew sheet.
//!
//! [`GridSource`] is the seam the sync pipeline reads and writes through.
//! [`client::GoogleSheetsClient`] talks to the Google Sheets v4 REST API;
//! [`memory::InMemoryGrid`] backs tests and local runs without credentials.

pub mod auth;
pub mod client;
pub mod config;
pub mod memory;
pub mod source;

pub use source::{GridError, GridSource};
