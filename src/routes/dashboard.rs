use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::db::DatabaseOperations;
use crate::models::{AppState, DashboardStats, OwnerQuery};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/dashboard", get(dashboard_stats))
        .with_state(state)
}

/// Totals, the most recent charts and a per-type chart count.
async fn dashboard_stats(
    State(state): State<AppState>,
    Query(owner): Query<OwnerQuery>,
) -> AppResult<Json<DashboardStats>> {
    let pool = state.pool()?;
    let stats = DatabaseOperations::dashboard_stats(pool, owner.user_id).await?;
    Ok(Json(stats))
}
