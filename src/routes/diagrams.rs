use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::db::DatabaseOperations;
use crate::models::{AppState, ListQuery, OwnerQuery, DiagramRecord, SaveDiagramRequest};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/diagrams", get(list_diagrams).post(create_diagram))
        .route(
            "/api/diagrams/{id}",
            get(get_diagram).put(update_diagram).delete(delete_diagram),
        )
        .with_state(state)
}

fn validate(request: &SaveDiagramRequest) -> AppResult<()> {
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidRequest("Title is required".to_string()));
    }
    if request.diagram.mermaid_code.trim().is_empty() {
        return Err(AppError::InvalidRequest("Mermaid code is required".to_string()));
    }
    Ok(())
}

async fn list_diagrams(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<DiagramRecord>>> {
    let pool = state.pool()?;
    let diagrams =
        DatabaseOperations::list_diagrams(pool, query.user_id, &query.filter()).await?;
    Ok(Json(diagrams))
}

async fn create_diagram(
    State(state): State<AppState>,
    Json(request): Json<SaveDiagramRequest>,
) -> AppResult<(StatusCode, Json<DiagramRecord>)> {
    validate(&request)?;

    let pool = state.pool()?;
    let diagram = DatabaseOperations::insert_diagram(pool, &request).await?;
    info!(diagram_id = %diagram.id, diagram_type = %diagram.diagram_type, "Diagram saved");

    Ok((StatusCode::CREATED, Json(diagram)))
}

async fn get_diagram(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(owner): Query<OwnerQuery>,
) -> AppResult<Json<DiagramRecord>> {
    let pool = state.pool()?;
    let diagram = DatabaseOperations::get_diagram(pool, id)
        .await?
        .filter(|d| d.user_id == owner.user_id)
        .ok_or_else(|| AppError::NotFound("Diagram".to_string()))?;

    Ok(Json(diagram))
}

async fn update_diagram(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SaveDiagramRequest>,
) -> AppResult<Json<DiagramRecord>> {
    validate(&request)?;

    let pool = state.pool()?;
    let diagram = DatabaseOperations::update_diagram(pool, id, &request).await?;
    info!(diagram_id = %diagram.id, "Diagram updated");

    Ok(Json(diagram))
}

async fn delete_diagram(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(owner): Query<OwnerQuery>,
) -> AppResult<StatusCode> {
    let pool = state.pool()?;
    DatabaseOperations::delete_diagram(pool, id, owner.user_id).await?;
    info!(diagram_id = %id, "Diagram deleted");

    Ok(StatusCode::NO_CONTENT)
}
