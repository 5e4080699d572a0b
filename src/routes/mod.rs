//! API Routes
//!
//! - `/api/process-data`, `/api/process-diagram` - AI reconciliation with local fallback
//! - `/api/health` - Provider and database status
//! - `/api/charts`, `/api/diagrams` - Saved records, filtered by `q` and `type` (needs a database)
//! - `/api/dashboard` - Saved-record totals and recent charts
//! - `/api/share`, `/api/shared/{token}` - Share links

pub mod charts;
pub mod dashboard;
pub mod diagrams;
pub mod health;
pub mod process;
pub mod sharing;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::cors_layer;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let cors = cors_layer(&state.config.server);

    Router::new()
        .merge(process::router(state.clone()))
        .merge(charts::router(state.clone()))
        .merge(diagrams::router(state.clone()))
        .merge(dashboard::router(state.clone()))
        .merge(sharing::router(state.clone()))
        .merge(health::router(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
