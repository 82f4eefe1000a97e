//! Shared fixtures for pipeline integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use orion_core::grid::Grid;
use orion_core::identity::IdentityTable;
use orion_pipeline::store::memory::InMemoryTripStore;
use orion_pipeline::sync::SyncContext;
use orion_pipeline::SyncConfig;
use orion_sheets::memory::InMemoryGrid;

pub const IVANOV: i64 = 101;
pub const PETROV: i64 = 102;
pub const KUROCHKINA: i64 = 103;

/// Address of the id cell of column C with the default layout.
pub const ID_CELL_C: &str = "Лист1!C5";

pub fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// Sheet with one month block `март` over columns C..E, an active training
/// on the 5th in column C and Иванов marked present there.
pub fn example_grid() -> Grid {
    let mut rows = vec![Vec::new(); 11];
    rows[0] = row(&["", "", "март", "", ""]);
    rows[2] = row(&["", "", "5", "6", "7"]);
    rows[5] = row(&["", "", "Т", "", ""]);
    rows[8] = row(&["Иванов", "", "1", "", ""]);
    rows[9] = row(&["Петров", "", "", "", ""]);
    rows[10] = row(&["Курочкина Ольга", "", "", "", ""]);
    Grid::new(rows)
}

pub struct Harness {
    pub grid: Arc<InMemoryGrid>,
    pub store: Arc<InMemoryTripStore>,
    pub identities: IdentityTable,
    pub config: SyncConfig,
}

impl Harness {
    pub async fn new(grid: Grid) -> Self {
        let store = Arc::new(InMemoryTripStore::default());
        store.add_user(IVANOV, "", "Иванов").await;
        store.add_user(PETROV, "", "Петров").await;
        store.add_user(KUROCHKINA, "Ольга", "Курочкина").await;

        Self {
            grid: Arc::new(InMemoryGrid::new(grid)),
            store,
            identities: IdentityTable::from_entries([
                ("Иванов", IVANOV),
                ("Петров", PETROV),
                ("Курочкина Ольга", KUROCHKINA),
            ]),
            config: SyncConfig::default(),
        }
    }

    pub fn ctx(&self) -> SyncContext<'_> {
        SyncContext {
            source: self.grid.as_ref(),
            store: self.store.as_ref(),
            identities: &self.identities,
            config: &self.config,
        }
    }

    /// Id written into the id cell of column C.
    pub async fn id_in_column_c(&self) -> uuid::Uuid {
        let grid = self.grid.snapshot().await;
        let column = grid.find_in_row(0, "март").expect("март header");
        uuid::Uuid::parse_str(grid.cell(4, column)).expect("id cell holds a uuid")
    }
}
