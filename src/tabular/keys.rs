//! Axis key heuristics for parsed CSV data

use serde_json::Value;

use super::TabularRecord;
use crate::payload::{capitalize, ChartConfig, ChartPayload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySelection {
    /// Columns where at least one row holds a number.
    pub numeric_keys: Vec<String>,
    /// Columns where every row holds a string.
    pub string_keys: Vec<String>,
    pub x_key: String,
    pub y_key: String,
}

/// Pick the category axis (first all-string column) and the measure axis
/// (first column with any numeric cell), falling back to header order.
pub fn select_keys(record: &TabularRecord) -> KeySelection {
    let numeric_keys: Vec<String> = record
        .headers
        .iter()
        .filter(|h| {
            record
                .rows
                .iter()
                .any(|row| matches!(row.get(h.as_str()), Some(Value::Number(_))))
        })
        .cloned()
        .collect();

    let string_keys: Vec<String> = record
        .headers
        .iter()
        .filter(|h| {
            record
                .rows
                .iter()
                .all(|row| matches!(row.get(h.as_str()), Some(Value::String(_))))
        })
        .cloned()
        .collect();

    let first = record.headers.first().cloned().unwrap_or_default();

    let x_key = string_keys.first().cloned().unwrap_or_else(|| first.clone());
    let y_key = numeric_keys
        .first()
        .or_else(|| record.headers.get(1))
        .cloned()
        .unwrap_or(first);

    KeySelection {
        numeric_keys,
        string_keys,
        x_key,
        y_key,
    }
}

/// Build the chart payload for CSV input. Insight text is structural only.
pub fn chart_from_table(record: TabularRecord, chart_type: &str) -> ChartPayload {
    let keys = select_keys(&record);
    let rows = record.row_count();

    ChartPayload {
        title: format!("{} Chart", capitalize(chart_type)),
        description: format!("Visualization of {} data", record.headers.join(", ")),
        insights: format!(
            "Chart shows relationship between {} and {}. Data contains {} records.",
            keys.x_key, keys.y_key, rows
        ),
        config: ChartConfig::new(keys.x_key, keys.y_key),
        chart_data: record.rows,
    }
}
