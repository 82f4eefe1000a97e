//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use orion_core::grid::Grid;
use orion_pipeline::service::IdentitySource;
use orion_pipeline::store::postgres::PgTripStore;
use orion_pipeline::{SyncConfig, TripsService};
use orion_sheets::memory::InMemoryGrid;
use sqlx::PgPool;
use tower::ServiceExt;

use orion_api::config::ServerConfig;
use orion_api::router::build_app_router;
use orion_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        crew_directory_path: None,
    }
}

/// Router plus handles on the in-memory sheet and the trip service.
pub struct TestApp {
    pub router: Router,
    pub grid: Arc<InMemoryGrid>,
    pub trips: Arc<TripsService>,
}

/// Build the full application over `pool` and an in-memory sheet holding
/// `grid`. Names are derived from registered users.
pub fn build_test_app_with_grid(pool: PgPool, grid: Grid) -> TestApp {
    let config = test_config();
    let sync_config = SyncConfig::default();
    let grid = Arc::new(InMemoryGrid::new(grid));
    let store = PgTripStore::new(pool.clone(), sync_config.utc_offset());
    let trips = Arc::new(TripsService::new(
        grid.clone(),
        Arc::new(store),
        IdentitySource::Users,
        sync_config,
    ));

    let state = AppState {
        pool,
        trips: Arc::clone(&trips),
    };

    TestApp {
        router: build_app_router(state, &config),
        grid,
        trips,
    }
}

/// Build the application over an empty sheet.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_grid(pool, Grid::default()).router
}

pub fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// One training on 5 March in column C with Иванов marked present.
pub fn example_grid() -> Grid {
    let mut rows = vec![Vec::new(); 11];
    rows[0] = row(&["", "", "март", "", ""]);
    rows[2] = row(&["", "", "5", "6", "7"]);
    rows[5] = row(&["", "", "Т", "", "Г"]);
    rows[8] = row(&["Иванов", "", "1", "", ""]);
    rows[9] = row(&["Петров", "", "", "", ""]);
    rows[10] = row(&["Курочкина Ольга", "", "", "", ""]);
    Grid::new(rows)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
