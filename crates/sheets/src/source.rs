use async_trait::async_trait;
use orion_core::grid::{CellRange, Grid};

/// Errors from reading or writing the sheet.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The Sheets or token endpoint returned a non-2xx status code.
    #[error("Sheets API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// Service-account credentials could not be loaded or signed.
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// The endpoint answered with a body we could not interpret.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Injected failure (in-memory source only).
    #[error("Grid unavailable: {0}")]
    Unavailable(String),
}

/// Read/write access to the sheet grid.
///
/// `fetch_grid` returns a snapshot; later `write_cell` calls never alter a
/// snapshot already handed out.
#[async_trait]
pub trait GridSource: Send + Sync {
    /// Fetch every populated cell of the configured sheet.
    async fn fetch_grid(&self) -> Result<Grid, GridError>;

    /// Overwrite a single cell.
    async fn write_cell(&self, range: &CellRange, value: &str) -> Result<(), GridError>;
}
