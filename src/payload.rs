//! Canonical chart and diagram payloads
//!
//! Every processing path (model output, CSV fallback, canned samples) ends in
//! one of the two payload types defined here. Model output crosses into these
//! types only through [`parse_chart_completion`] / [`parse_diagram_completion`];
//! anything that does not validate is rejected so the caller can fall back.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// One row of chart data: column name to number or string, in column order.
pub type DataPoint = Map<String, Value>;

/// Chart kinds the renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Area,
    Scatter,
    Trend,
}

impl ChartType {
    pub const ALL: [ChartType; 6] = [
        ChartType::Bar,
        ChartType::Line,
        ChartType::Pie,
        ChartType::Area,
        ChartType::Scatter,
        ChartType::Trend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Area => "area",
            ChartType::Scatter => "scatter",
            ChartType::Trend => "trend",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Diagram kinds with a template in the template bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramType {
    Flowchart,
    Mindmap,
    Orgchart,
    Sequence,
    Network,
    Gantt,
    Gitgraph,
    Journey,
}

impl DiagramType {
    pub const ALL: [DiagramType; 8] = [
        DiagramType::Flowchart,
        DiagramType::Mindmap,
        DiagramType::Orgchart,
        DiagramType::Sequence,
        DiagramType::Network,
        DiagramType::Gantt,
        DiagramType::Gitgraph,
        DiagramType::Journey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramType::Flowchart => "flowchart",
            DiagramType::Mindmap => "mindmap",
            DiagramType::Orgchart => "orgchart",
            DiagramType::Sequence => "sequence",
            DiagramType::Network => "network",
            DiagramType::Gantt => "gantt",
            DiagramType::Gitgraph => "gitgraph",
            DiagramType::Journey => "journey",
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramType {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiagramType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown kind: {0}")]
pub struct UnknownKind(pub String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub x_key: String,
    pub y_key: String,
}

impl ChartConfig {
    pub fn new(x_key: impl Into<String>, y_key: impl Into<String>) -> Self {
        Self {
            x_key: x_key.into(),
            y_key: y_key.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPayload {
    pub chart_data: Vec<DataPoint>,
    pub config: ChartConfig,
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub description: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub insights: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramPayload {
    pub mermaid_code: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub description: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub diagram_type: String,
}

/// Response envelope of both processing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Processed<T> {
    pub processed_data: T,
}

impl<T> Processed<T> {
    pub fn new(processed_data: T) -> Self {
        Self { processed_data }
    }
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Why a model completion was rejected.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("completion is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("completion is not a JSON object")]
    NotAnObject,

    #[error("chartData is missing or not an array")]
    MissingChartData,

    #[error("mermaidCode is missing or empty")]
    MissingMermaidCode,

    #[error("payload does not match the expected schema: {0}")]
    Schema(#[source] serde_json::Error),

    #[error("chartData row {row} has a non-scalar value under {key:?}")]
    InvalidValue { row: usize, key: String },

    #[error("chartData row {row} has no {key:?} column named by config")]
    MissingAxisKey { row: usize, key: String },
}

/// Strip Markdown code fences a model tends to wrap JSON in, then trim.
pub fn clean_completion(raw: &str) -> String {
    raw.replace("```json\n", "")
        .replace("```json", "")
        .replace("\n```", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse cleaned completion text and unwrap an optional `processedData` wrapper.
fn parse_object(raw: &str) -> Result<Map<String, Value>, PayloadError> {
    let cleaned = clean_completion(raw);
    let value: Value = serde_json::from_str(&cleaned).map_err(PayloadError::Json)?;

    let value = match value {
        Value::Object(mut obj) => match obj.remove("processedData") {
            Some(inner) if !inner.is_null() => inner,
            Some(_) | None => Value::Object(obj),
        },
        _ => return Err(PayloadError::NotAnObject),
    };

    match value {
        Value::Object(obj) => Ok(obj),
        _ => Err(PayloadError::NotAnObject),
    }
}

/// Validate a model completion as a chart payload.
pub fn parse_chart_completion(raw: &str) -> Result<ChartPayload, PayloadError> {
    let obj = parse_object(raw)?;

    if !matches!(obj.get("chartData"), Some(Value::Array(_))) {
        return Err(PayloadError::MissingChartData);
    }

    let payload: ChartPayload =
        serde_json::from_value(Value::Object(obj)).map_err(PayloadError::Schema)?;
    validate_rows(&payload)?;
    Ok(payload)
}

/// Rows hold only numbers and strings, and every row carries both axis keys.
fn validate_rows(payload: &ChartPayload) -> Result<(), PayloadError> {
    let axes = [&payload.config.x_key, &payload.config.y_key];

    for (row, point) in payload.chart_data.iter().enumerate() {
        if let Some((key, _)) = point
            .iter()
            .find(|(_, v)| !matches!(v, Value::Number(_) | Value::String(_)))
        {
            return Err(PayloadError::InvalidValue {
                row,
                key: key.clone(),
            });
        }
        if let Some(key) = axes.iter().find(|k| !point.contains_key(k.as_str())) {
            return Err(PayloadError::MissingAxisKey {
                row,
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

/// Validate a model completion as a diagram payload. A missing `diagramType`
/// is filled with the requested type.
pub fn parse_diagram_completion(
    raw: &str,
    requested_type: &str,
) -> Result<DiagramPayload, PayloadError> {
    let obj = parse_object(raw)?;

    match obj.get("mermaidCode") {
        Some(Value::String(code)) if !code.trim().is_empty() => {}
        _ => return Err(PayloadError::MissingMermaidCode),
    }

    let mut payload: DiagramPayload =
        serde_json::from_value(Value::Object(obj)).map_err(PayloadError::Schema)?;
    if payload.diagram_type.is_empty() {
        payload.diagram_type = requested_type.to_string();
    }
    Ok(payload)
}

/// Uppercase the first character: `"bar"` becomes `"Bar"`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
