//! CSV parsing and cell coercion
//!
//! Splitting is deliberately naive: quoting is turned off in the reader, so a
//! comma inside a quoted field still separates fields. Such a row ends up with
//! more fields than the header and is dropped.

use csv::ReaderBuilder;
use serde_json::{Number, Value};
use tracing::debug;

use super::TabularError;
use crate::payload::DataPoint;

/// Largest magnitude at which every integer is exactly representable as f64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Parsed CSV: header names in order plus the surviving rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularRecord {
    pub headers: Vec<String>,
    pub rows: Vec<DataPoint>,
}

impl TabularRecord {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Parse comma-delimited text whose first line is the header.
pub fn parse_csv(text: &str) -> Result<TabularRecord, TabularError> {
    let text = text.trim();
    let non_blank = text.lines().filter(|l| !l.trim().is_empty()).count();
    if non_blank < 2 {
        return Err(TabularError::EmptyInput);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut records = reader.records();

    let headers: Vec<String> = match records.next() {
        Some(Ok(record)) => record.iter().map(clean_field).collect(),
        Some(Err(e)) => {
            debug!(error = %e, "Unreadable CSV header");
            return Err(TabularError::EmptyInput);
        }
        None => return Err(TabularError::EmptyInput),
    };

    let mut rows = Vec::new();
    for (line, record) in records.enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!(line = line + 2, error = %e, "Skipping unreadable CSV row");
                continue;
            }
        };

        if record.len() != headers.len() {
            debug!(
                line = line + 2,
                fields = record.len(),
                expected = headers.len(),
                "Dropping CSV row with mismatched column count"
            );
            continue;
        }

        let row: DataPoint = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), coerce_cell(cell)))
            .collect();

        if row.values().all(|v| v.as_str() == Some("")) {
            continue;
        }
        rows.push(row);
    }

    debug!(columns = headers.len(), rows = rows.len(), "Parsed CSV input");
    Ok(TabularRecord { headers, rows })
}

/// Coerce one cell: a finite decimal becomes a number, anything else stays a
/// trimmed string. Empty cells stay `""`.
pub fn coerce_cell(raw: &str) -> Value {
    let text = clean_field(raw);
    if text.is_empty() {
        return Value::String(text);
    }

    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => number_value(n).unwrap_or(Value::String(text)),
        _ => Value::String(text),
    }
}

fn number_value(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER {
        return Some(Value::Number(Number::from(n as i64)));
    }
    Number::from_f64(n).map(Value::Number)
}

fn clean_field(raw: &str) -> String {
    raw.trim().trim_matches('"').trim().to_string()
}
