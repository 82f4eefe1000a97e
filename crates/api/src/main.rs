use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use orion_core::identity::IdentityTable;
use orion_pipeline::service::IdentitySource;
use orion_pipeline::store::postgres::PgTripStore;
use orion_pipeline::{SyncConfig, TripsService};
use orion_sheets::client::GoogleSheetsClient;
use orion_sheets::config::SheetsConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orion_api::config::ServerConfig;
use orion_api::router::build_app_router;
use orion_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "orion_api=debug,orion_pipeline=debug,orion_sheets=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let sync_config = SyncConfig::from_env();
    let sheets_config = SheetsConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        year = sync_config.year,
        sheet = %sheets_config.sheet_name,
        "Loaded server configuration",
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = orion_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    orion_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    orion_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Crew identities ---
    let identities = match &config.crew_directory_path {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .unwrap_or_else(|e| panic!("Failed to read crew directory '{path}': {e}"));
            let table = IdentityTable::from_json(&json)
                .unwrap_or_else(|e| panic!("Invalid crew directory '{path}': {e}"));
            tracing::info!(path = %path, entries = table.len(), "Loaded crew directory");
            IdentitySource::Directory(Arc::new(table))
        }
        None => {
            tracing::info!("No crew directory configured, deriving names from users");
            IdentitySource::Users
        }
    };

    // --- Sheets client ---
    let sheets = GoogleSheetsClient::from_config(&sheets_config)
        .await
        .expect("Failed to initialise Google Sheets client");
    tracing::info!(spreadsheet_id = %sheets_config.spreadsheet_id, "Google Sheets client ready");

    // --- Trip service ---
    let store = PgTripStore::new(pool.clone(), sync_config.utc_offset());
    let trips = Arc::new(TripsService::new(
        Arc::new(sheets),
        Arc::new(store),
        identities,
        sync_config,
    ));
    trips.start().await;

    // --- App state ---
    let state = AppState {
        pool,
        trips: Arc::clone(&trips),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(grace, trips.stop()).await.is_err() {
        tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "Trip sync did not stop in time"
        );
    } else {
        tracing::info!("Trip sync stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
