//! In-process [`GridSource`] for tests and credential-less local runs.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use orion_core::grid::{CellRange, Grid};
use tokio::sync::RwLock;

use crate::source::{GridError, GridSource};

/// A grid held in memory. Writes land in the grid and are also recorded in
/// order so tests can assert on the exact addresses written.
#[derive(Default)]
pub struct InMemoryGrid {
    grid: RwLock<Grid>,
    writes: RwLock<Vec<(String, String)>>,
    fail_writes: AtomicBool,
    fail_fetch: AtomicBool,
}

impl InMemoryGrid {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid: RwLock::new(grid),
            ..Default::default()
        }
    }

    /// Current grid contents, including writes.
    pub async fn snapshot(&self) -> Grid {
        self.grid.read().await.clone()
    }

    /// Replace the whole grid, as a human editor would.
    pub async fn replace(&self, grid: Grid) {
        *self.grid.write().await = grid;
    }

    /// Every successful write as `(A1 range, value)`, oldest first.
    pub async fn writes(&self) -> Vec<(String, String)> {
        self.writes.read().await.clone()
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent fetches fail (or succeed again).
    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl GridSource for InMemoryGrid {
    async fn fetch_grid(&self) -> Result<Grid, GridError> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(GridError::Unavailable("fetch disabled".into()));
        }
        Ok(self.grid.read().await.clone())
    }

    async fn write_cell(&self, range: &CellRange, value: &str) -> Result<(), GridError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GridError::Unavailable(format!("write to {range} disabled")));
        }
        self.grid
            .write()
            .await
            .set_cell(range.row, range.column, value);
        self.writes
            .write()
            .await
            .push((range.to_string(), value.to_string()));
        Ok(())
    }
}
