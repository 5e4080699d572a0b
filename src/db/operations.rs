use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::*;
use crate::share::ResourceType;
use crate::types::{AppError, AppResult};

pub struct DatabaseOperations;

/// Charts listed on the dashboard overview.
pub const RECENT_CHARTS_LIMIT: i64 = 5;

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

impl DatabaseOperations {
    // Chart operations
    pub async fn insert_chart(pool: &PgPool, request: &SaveChartRequest) -> AppResult<ChartRecord> {
        let chart = sqlx::query_as::<_, ChartRecord>(
            r#"
            INSERT INTO charts (user_id, title, description, chart_type, chart_data, config, insights)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(request.user_id)
        .bind(&request.title)
        .bind(non_empty(request.description.as_deref()))
        .bind(&request.chart_type)
        .bind(Json(&request.chart.chart_data))
        .bind(Json(&request.chart.config))
        .bind(non_empty(Some(request.chart.insights.as_str())))
        .fetch_one(pool)
        .await?;

        Ok(chart)
    }

    pub async fn update_chart(
        pool: &PgPool,
        chart_id: Uuid,
        request: &SaveChartRequest,
    ) -> AppResult<ChartRecord> {
        sqlx::query_as::<_, ChartRecord>(
            r#"
            UPDATE charts
            SET title = $3, description = $4, chart_type = $5, chart_data = $6,
                config = $7, insights = $8, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(chart_id)
        .bind(request.user_id)
        .bind(&request.title)
        .bind(non_empty(request.description.as_deref()))
        .bind(&request.chart_type)
        .bind(Json(&request.chart.chart_data))
        .bind(Json(&request.chart.config))
        .bind(non_empty(Some(request.chart.insights.as_str())))
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Chart".to_string()))
    }

    pub async fn delete_chart(pool: &PgPool, chart_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM charts WHERE id = $1 AND user_id = $2")
            .bind(chart_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Chart".to_string()));
        }
        Ok(())
    }

    pub async fn get_chart(pool: &PgPool, chart_id: Uuid) -> AppResult<Option<ChartRecord>> {
        let chart = sqlx::query_as::<_, ChartRecord>("SELECT * FROM charts WHERE id = $1")
            .bind(chart_id)
            .fetch_optional(pool)
            .await?;

        Ok(chart)
    }

    pub async fn list_charts(
        pool: &PgPool,
        user_id: Uuid,
        filter: &ListFilter,
    ) -> AppResult<Vec<ChartRecord>> {
        let charts = sqlx::query_as::<_, ChartRecord>(
            r#"
            SELECT * FROM charts
            WHERE user_id = $1
              AND ($2::text IS NULL OR title ILIKE $2 OR description ILIKE $2)
              AND ($3::text IS NULL OR chart_type = $3)
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.pattern.as_deref())
        .bind(filter.kind.as_deref())
        .fetch_all(pool)
        .await?;

        Ok(charts)
    }

    // Diagram operations
    pub async fn insert_diagram(
        pool: &PgPool,
        request: &SaveDiagramRequest,
    ) -> AppResult<DiagramRecord> {
        let diagram = sqlx::query_as::<_, DiagramRecord>(
            r#"
            INSERT INTO diagrams (user_id, title, description, diagram_type, mermaid_code, diagram_data)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(request.user_id)
        .bind(&request.title)
        .bind(non_empty(request.description.as_deref()))
        .bind(&request.diagram.diagram_type)
        .bind(&request.diagram.mermaid_code)
        .bind(Json(&request.diagram))
        .fetch_one(pool)
        .await?;

        Ok(diagram)
    }

    pub async fn update_diagram(
        pool: &PgPool,
        diagram_id: Uuid,
        request: &SaveDiagramRequest,
    ) -> AppResult<DiagramRecord> {
        sqlx::query_as::<_, DiagramRecord>(
            r#"
            UPDATE diagrams
            SET title = $3, description = $4, diagram_type = $5, mermaid_code = $6,
                diagram_data = $7, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(diagram_id)
        .bind(request.user_id)
        .bind(&request.title)
        .bind(non_empty(request.description.as_deref()))
        .bind(&request.diagram.diagram_type)
        .bind(&request.diagram.mermaid_code)
        .bind(Json(&request.diagram))
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Diagram".to_string()))
    }

    pub async fn delete_diagram(pool: &PgPool, diagram_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM diagrams WHERE id = $1 AND user_id = $2")
            .bind(diagram_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Diagram".to_string()));
        }
        Ok(())
    }

    pub async fn get_diagram(pool: &PgPool, diagram_id: Uuid) -> AppResult<Option<DiagramRecord>> {
        let diagram = sqlx::query_as::<_, DiagramRecord>("SELECT * FROM diagrams WHERE id = $1")
            .bind(diagram_id)
            .fetch_optional(pool)
            .await?;

        Ok(diagram)
    }

    pub async fn list_diagrams(
        pool: &PgPool,
        user_id: Uuid,
        filter: &ListFilter,
    ) -> AppResult<Vec<DiagramRecord>> {
        let diagrams = sqlx::query_as::<_, DiagramRecord>(
            r#"
            SELECT * FROM diagrams
            WHERE user_id = $1
              AND ($2::text IS NULL OR title ILIKE $2 OR description ILIKE $2)
              AND ($3::text IS NULL OR diagram_type = $3)
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.pattern.as_deref())
        .bind(filter.kind.as_deref())
        .fetch_all(pool)
        .await?;

        Ok(diagrams)
    }

    // Dashboard
    pub async fn dashboard_stats(pool: &PgPool, user_id: Uuid) -> AppResult<DashboardStats> {
        let total_charts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM charts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        let total_diagrams: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM diagrams WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        let recent_charts = sqlx::query_as::<_, ChartRecord>(
            "SELECT * FROM charts WHERE user_id = $1 ORDER BY updated_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(RECENT_CHARTS_LIMIT)
        .fetch_all(pool)
        .await?;

        let chart_types: Vec<(String, i64)> = sqlx::query_as(
            "SELECT chart_type, COUNT(*) FROM charts WHERE user_id = $1 GROUP BY chart_type",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(DashboardStats {
            total_charts,
            total_diagrams,
            recent_charts,
            chart_types: chart_types.into_iter().collect(),
        })
    }

    // Share operations
    pub async fn create_share(
        pool: &PgPool,
        request: &ShareRequest,
        share_token: &str,
    ) -> AppResult<SharedResource> {
        let shared = sqlx::query_as::<_, SharedResource>(
            r#"
            INSERT INTO shared_resources (resource_id, resource_type, user_id, share_token, is_public, allow_embed)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            RETURNING *
            "#,
        )
        .bind(request.resource_id)
        .bind(request.resource_type.as_str())
        .bind(request.user_id)
        .bind(share_token)
        .bind(request.allow_embed)
        .fetch_one(pool)
        .await?;

        Ok(shared)
    }

    /// Only public shares resolve.
    pub async fn get_public_share(
        pool: &PgPool,
        share_token: &str,
    ) -> AppResult<Option<SharedResource>> {
        let shared = sqlx::query_as::<_, SharedResource>(
            "SELECT * FROM shared_resources WHERE share_token = $1 AND is_public = TRUE",
        )
        .bind(share_token)
        .fetch_optional(pool)
        .await?;

        Ok(shared)
    }

    /// Whether the caller owns the record they are about to share.
    pub async fn owns_resource(
        pool: &PgPool,
        resource_type: ResourceType,
        resource_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<bool> {
        let query = match resource_type {
            ResourceType::Chart => "SELECT EXISTS(SELECT 1 FROM charts WHERE id = $1 AND user_id = $2)",
            ResourceType::Diagram => "SELECT EXISTS(SELECT 1 FROM diagrams WHERE id = $1 AND user_id = $2)",
        };

        let exists: bool = sqlx::query_scalar(query)
            .bind(resource_id)
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(exists)
    }
}
