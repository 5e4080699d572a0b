use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::db::DatabaseOperations;
use crate::models::{AppState, ListQuery, OwnerQuery, ChartRecord, SaveChartRequest};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/charts", get(list_charts).post(create_chart))
        .route(
            "/api/charts/{id}",
            get(get_chart).put(update_chart).delete(delete_chart),
        )
        .with_state(state)
}

async fn list_charts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ChartRecord>>> {
    let pool = state.pool()?;
    let charts = DatabaseOperations::list_charts(pool, query.user_id, &query.filter()).await?;
    Ok(Json(charts))
}

async fn create_chart(
    State(state): State<AppState>,
    Json(request): Json<SaveChartRequest>,
) -> AppResult<(StatusCode, Json<ChartRecord>)> {
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidRequest("Title is required".to_string()));
    }

    let pool = state.pool()?;
    let chart = DatabaseOperations::insert_chart(pool, &request).await?;
    info!(chart_id = %chart.id, chart_type = %chart.chart_type, "Chart saved");

    Ok((StatusCode::CREATED, Json(chart)))
}

async fn get_chart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(owner): Query<OwnerQuery>,
) -> AppResult<Json<ChartRecord>> {
    let pool = state.pool()?;
    let chart = DatabaseOperations::get_chart(pool, id)
        .await?
        .filter(|c| c.user_id == owner.user_id)
        .ok_or_else(|| AppError::NotFound("Chart".to_string()))?;

    Ok(Json(chart))
}

async fn update_chart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SaveChartRequest>,
) -> AppResult<Json<ChartRecord>> {
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidRequest("Title is required".to_string()));
    }

    let pool = state.pool()?;
    let chart = DatabaseOperations::update_chart(pool, id, &request).await?;
    info!(chart_id = %chart.id, "Chart updated");

    Ok(Json(chart))
}

async fn delete_chart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(owner): Query<OwnerQuery>,
) -> AppResult<StatusCode> {
    let pool = state.pool()?;
    DatabaseOperations::delete_chart(pool, id, owner.user_id).await?;
    info!(chart_id = %id, "Chart deleted");

    Ok(StatusCode::NO_CONTENT)
}
