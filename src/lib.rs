// Rechart - CSV and natural-language input to chart and diagram payloads

pub mod config;
pub mod db;
pub mod models;
pub mod types;
pub mod payload;
pub mod tabular;   // Naive CSV parsing and axis selection
pub mod samples;
pub mod templates; // Mermaid templates per diagram type
pub mod fallback;
pub mod llm;
pub mod reconciler;
pub mod share;
pub mod view;      // Client screen flow
pub mod routes;
pub mod middleware;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
pub use reconciler::Reconciler;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
