/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including database loading, state creation, and route configuration.
 *
 * # Initialization Process
 *
 * 1. Open the SQLite pool and apply migrations
 * 2. Make sure the upload directory exists
 * 3. Create the application state (broadcast channel, keys, limiter)
 * 4. Create and configure the router
 * 5. Start the periodic rate-limiter sweep
 */

use axum::Router;

use crate::backend::error::BackendError;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// How often idle rate-limit windows are dropped
const LIMITER_SWEEP_INTERVAL_SECS: u64 = 300;

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails when the database cannot be opened or migrated, or when the upload
/// directory cannot be created.
pub async fn create_app(config: ServerConfig) -> Result<Router<()>, BackendError> {
    tracing::info!("Initializing feed server");

    let db_pool = load_database(&config.database_url).await?;
    let app_state = AppState::new(config, db_pool);
    app_state.uploads.ensure_dir().await?;

    tracing::info!(
        "State initialized (uploads in {}, feed limit {})",
        app_state.uploads.dir().display(),
        app_state.config.feed_limit
    );

    let app = create_router(app_state.clone());

    let limiter = app_state.post_limiter.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(LIMITER_SWEEP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            let dropped = limiter.sweep();
            tracing::debug!("Dropped {} idle rate-limit windows", dropped);
        }
    });

    tracing::info!("Router configured with periodic limiter sweep");

    Ok(app)
}
