use axum::{extract::State, routing::get, Json, Router};
use tracing::{error, warn};

use crate::db;
use crate::models::{AppState, HealthResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let xai_configured = state.reconciler.is_configured();

    let (api_connected, available_models) = match state.reconciler.adapter() {
        Some(adapter) => match adapter.list_models().await {
            Ok(models) => (true, models),
            Err(e) => {
                error!(error = %e, "Error checking API connectivity");
                (false, Vec::new())
            }
        },
        None => (false, Vec::new()),
    };

    let database = match &state.pool {
        Some(pool) => match db::health_check(pool).await {
            Ok(_) => "connected",
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                "disconnected"
            }
        },
        None => "not_configured",
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        xai_configured,
        api_connected,
        available_models,
        database: database.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
