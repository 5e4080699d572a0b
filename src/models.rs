use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use sqlx::types::Json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::payload::{ChartConfig, ChartPayload, DataPoint, DiagramPayload};
use crate::reconciler::Reconciler;
use crate::share::ResourceType;
use crate::types::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub pool: Option<PgPool>,
    pub config: Config,
    pub reconciler: Arc<Reconciler>,
}

impl AppState {
    /// The database pool, or 503 when persistence is not configured.
    pub fn pool(&self) -> AppResult<&PgPool> {
        self.pool
            .as_ref()
            .ok_or_else(|| AppError::Unavailable("DATABASE_URL is not configured".to_string()))
    }
}

// Stored rows
// Note: FromRow is needed for runtime query_as (without DATABASE_URL at compile time)

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChartRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub chart_type: String,
    pub chart_data: Json<Vec<DataPoint>>,
    pub config: Json<ChartConfig>,
    pub insights: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DiagramRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub diagram_type: String,
    pub mermaid_code: String,
    pub diagram_data: Json<DiagramPayload>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SharedResource {
    pub id: Uuid,
    pub resource_id: Uuid,
    pub resource_type: String,
    pub user_id: Uuid,
    pub share_token: String,
    pub is_public: bool,
    pub allow_embed: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Re-open a saved chart for rendering.
impl From<ChartRecord> for ChartPayload {
    fn from(record: ChartRecord) -> Self {
        ChartPayload {
            chart_data: record.chart_data.0,
            config: record.config.0,
            title: record.title,
            description: record.description.unwrap_or_default(),
            insights: record.insights.unwrap_or_default(),
        }
    }
}

/// Re-open a saved diagram for rendering.
impl From<DiagramRecord> for DiagramPayload {
    fn from(record: DiagramRecord) -> Self {
        DiagramPayload {
            mermaid_code: record.mermaid_code,
            title: record.title,
            description: record.description.unwrap_or_default(),
            diagram_type: record.diagram_type,
        }
    }
}

// API Request/Response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDataRequest {
    pub data: String,
    pub chart_type: String,
    #[serde(rename = "isCSV", default)]
    pub is_csv: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDiagramRequest {
    #[serde(default)]
    pub description: String,
    pub diagram_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveChartRequest {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub chart_type: String,
    pub chart: ChartPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDiagramRequest {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub diagram: DiagramPayload,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: Uuid,
}

/// `GET /api/charts` and `GET /api/diagrams` query: owner plus optional
/// search text and type filter.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: Uuid,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Filters applied by the list queries. `None` means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// ILIKE pattern matched against title and description.
    pub pattern: Option<String>,
    pub kind: Option<String>,
}

impl ListQuery {
    pub fn filter(&self) -> ListFilter {
        let pattern = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{}%", escape_like(q)));
        let kind = self
            .kind
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != "all")
            .map(str::to_string);

        ListFilter { pattern, kind }
    }
}

/// Search text is matched literally; `%`, `_` and `\` lose their LIKE meaning.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_charts: i64,
    pub total_diagrams: i64,
    /// Most recently updated first.
    pub recent_charts: Vec<ChartRecord>,
    /// Saved chart count per chart type.
    pub chart_types: BTreeMap<String, i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub resource_id: Uuid,
    pub resource_type: ResourceType,
    pub user_id: Uuid,
    #[serde(default)]
    pub allow_embed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    pub share_token: String,
    pub share_url: String,
    pub embed_code: String,
}

#[derive(Debug, Deserialize)]
pub struct SharedQuery {
    pub embed: Option<String>,
}

impl SharedQuery {
    pub fn is_embed(&self) -> bool {
        self.embed.as_deref() == Some("true")
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedResourceResponse {
    pub resource: serde_json::Value,
    pub resource_type: ResourceType,
    pub is_embed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub xai_configured: bool,
    pub api_connected: bool,
    pub available_models: Vec<String>,
    pub database: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_process_data_request_field_names() {
        let req: ProcessDataRequest =
            serde_json::from_value(json!({"data": "a,b", "chartType": "bar", "isCSV": true})).unwrap();
        assert!(req.is_csv);
        assert_eq!(req.chart_type, "bar");

        let req: ProcessDataRequest =
            serde_json::from_value(json!({"data": "sales", "chartType": "line"})).unwrap();
        assert!(!req.is_csv);
    }

    #[test]
    fn test_process_diagram_request_allows_missing_description() {
        let req: ProcessDiagramRequest =
            serde_json::from_value(json!({"diagramType": "mindmap"})).unwrap();
        assert_eq!(req.description, "");
    }

    #[test]
    fn test_shared_query_embed_flag() {
        assert!(SharedQuery { embed: Some("true".into()) }.is_embed());
        assert!(!SharedQuery { embed: Some("1".into()) }.is_embed());
        assert!(!SharedQuery { embed: None }.is_embed());
    }

    fn list_query(q: Option<&str>, kind: Option<&str>) -> ListQuery {
        ListQuery {
            user_id: Uuid::new_v4(),
            q: q.map(str::to_string),
            kind: kind.map(str::to_string),
        }
    }

    #[test]
    fn test_list_query_field_names() {
        let query: ListQuery = serde_json::from_value(json!({
            "user_id": "6f1c5a52-3b9e-4b6f-8d56-0e4d1c1c2b11",
            "q": "sales",
            "type": "bar"
        }))
        .unwrap();
        assert_eq!(query.q.as_deref(), Some("sales"));
        assert_eq!(query.kind.as_deref(), Some("bar"));
    }

    #[test]
    fn test_list_filter_builds_search_pattern() {
        let filter = list_query(Some("  Revenue "), Some("line")).filter();
        assert_eq!(filter.pattern.as_deref(), Some("%Revenue%"));
        assert_eq!(filter.kind.as_deref(), Some("line"));

        let filter = list_query(Some("50%_off\\x"), None).filter();
        assert_eq!(filter.pattern.as_deref(), Some("%50\\%\\_off\\\\x%"));
    }

    #[test]
    fn test_list_filter_blank_and_all_mean_unfiltered() {
        assert_eq!(list_query(None, None).filter(), ListFilter::default());
        assert_eq!(list_query(Some("   "), Some("all")).filter(), ListFilter::default());
        assert_eq!(list_query(Some(""), Some("")).filter(), ListFilter::default());
    }

    #[test]
    fn test_dashboard_stats_serializes_camel_case() {
        let stats = DashboardStats {
            total_charts: 3,
            total_diagrams: 1,
            recent_charts: vec![],
            chart_types: BTreeMap::from([("bar".to_string(), 2), ("pie".to_string(), 1)]),
        };
        assert_eq!(
            serde_json::to_value(stats).unwrap(),
            json!({
                "totalCharts": 3,
                "totalDiagrams": 1,
                "recentCharts": [],
                "chartTypes": {"bar": 2, "pie": 1}
            })
        );
    }

    #[test]
    fn test_chart_record_reopens_as_payload() {
        let now = chrono::Utc::now();
        let record = ChartRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Revenue".into(),
            description: None,
            chart_type: "bar".into(),
            chart_data: Json(vec![]),
            config: Json(ChartConfig::new("month", "revenue")),
            insights: Some("Up".into()),
            created_at: now,
            updated_at: now,
        };
        let payload = ChartPayload::from(record);
        assert_eq!(payload.title, "Revenue");
        assert_eq!(payload.description, "");
        assert_eq!(payload.insights, "Up");
        assert_eq!(payload.config.y_key, "revenue");
    }
}
