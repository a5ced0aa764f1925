/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Layers
 *
 * - `CorsLayer` allowing the configured origin with credentials
 * - `TraceLayer` producing a span per request
 */

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::backend::error::BackendError;
use crate::backend::realtime::subscription::handle_realtime_subscription;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// 1. **Realtime**: `GET /realtime` SSE stream
/// 2. **API Routes**: authentication and feed
/// 3. **Uploads**: stored images under `/uploads`
/// 4. **Fallback Handler**: JSON 404
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/realtime", get(handle_realtime_subscription));

    let router = configure_api_routes(router, &app_state);

    let router = router.nest_service("/uploads", ServeDir::new(app_state.uploads.dir()));

    let router = router.fallback(|| async { BackendError::not_found("Route not found") });

    router
        .layer(cors_layer(&app_state.config.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true);

    match HeaderValue::from_str(origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!("Invalid CORS_ORIGIN {:?} ({}), cross-origin requests disabled", origin, e);
            layer
        }
    }
}
