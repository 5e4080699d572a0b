use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, warn};

use crate::db::DatabaseOperations;
use crate::models::{AppState, ShareRequest, ShareResponse, SharedQuery, SharedResourceResponse};
use crate::share::{self, ResourceType};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/share", post(create_share))
        .route("/api/shared/{token}", get(get_shared))
        .with_state(state)
}

async fn create_share(
    State(state): State<AppState>,
    Json(request): Json<ShareRequest>,
) -> AppResult<(StatusCode, Json<ShareResponse>)> {
    let pool = state.pool()?;

    let owned = DatabaseOperations::owns_resource(
        pool,
        request.resource_type,
        request.resource_id,
        request.user_id,
    )
    .await?;
    if !owned {
        warn!(resource_id = %request.resource_id, "Share requested for a resource the caller does not own");
        return Err(AppError::NotFound("Resource".to_string()));
    }

    let token = share::generate_share_token();
    let shared = DatabaseOperations::create_share(pool, &request, &token).await?;

    let share_url = share::share_url(&state.config.server.public_base_url, &shared.share_token);
    info!(
        resource_type = %request.resource_type,
        resource_id = %request.resource_id,
        allow_embed = shared.allow_embed,
        "Share link created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ShareResponse {
            embed_code: share::embed_code(&share_url),
            share_token: shared.share_token,
            share_url,
        }),
    ))
}

async fn get_shared(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<SharedQuery>,
) -> AppResult<Json<SharedResourceResponse>> {
    let pool = state.pool()?;
    let is_embed = query.is_embed();

    let shared = DatabaseOperations::get_public_share(pool, &token)
        .await?
        .ok_or_else(|| AppError::NotFound("Shared resource".to_string()))?;
    share::check_access(&shared, is_embed)?;

    let resource_type: ResourceType = shared.resource_type.parse()?;
    let resource = match resource_type {
        ResourceType::Chart => {
            let chart = DatabaseOperations::get_chart(pool, shared.resource_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Chart".to_string()))?;
            serde_json::to_value(chart)
        }
        ResourceType::Diagram => {
            let diagram = DatabaseOperations::get_diagram(pool, shared.resource_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Diagram".to_string()))?;
            serde_json::to_value(diagram)
        }
    }
    .map_err(|e| AppError::Internal(format!("Failed to serialize shared resource: {}", e)))?;

    Ok(Json(SharedResourceResponse {
        resource,
        resource_type,
        is_embed,
    }))
}
