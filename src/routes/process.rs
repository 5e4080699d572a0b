use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::info;

use crate::models::{AppState, ProcessDataRequest, ProcessDiagramRequest};
use crate::payload::{ChartPayload, DiagramPayload, Processed};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/process-data", post(process_data))
        .route("/api/process-diagram", post(process_diagram))
        .with_state(state)
}

/// Always answers 200 with a renderable chart unless the body is malformed.
async fn process_data(
    State(state): State<AppState>,
    body: Result<Json<ProcessDataRequest>, JsonRejection>,
) -> AppResult<Json<Processed<ChartPayload>>> {
    let Json(request) = body.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    info!(
        chart_type = %request.chart_type,
        is_csv = request.is_csv,
        data_len = request.data.len(),
        ai_configured = state.reconciler.is_configured(),
        "Processing chart data"
    );

    let result = state
        .reconciler
        .process_data(&request.data, &request.chart_type, request.is_csv)
        .await;

    info!(source = ?result.source, rows = result.payload.chart_data.len(), "Chart data processed");
    Ok(Json(Processed::new(result.payload)))
}

/// Always answers 200 with Mermaid code unless the body is malformed.
async fn process_diagram(
    State(state): State<AppState>,
    body: Result<Json<ProcessDiagramRequest>, JsonRejection>,
) -> AppResult<Json<Processed<DiagramPayload>>> {
    let Json(request) = body.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    info!(
        diagram_type = %request.diagram_type,
        description_len = request.description.len(),
        ai_configured = state.reconciler.is_configured(),
        "Processing diagram"
    );

    let result = state
        .reconciler
        .process_diagram(&request.description, &request.diagram_type)
        .await;

    info!(source = ?result.source, "Diagram processed");
    Ok(Json(Processed::new(result.payload)))
}
