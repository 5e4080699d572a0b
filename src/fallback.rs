//! Network-free payload construction
//!
//! These are what the processing endpoints return whenever the model is not
//! configured, unreachable, or produces something that does not validate.

use tracing::{info, warn};

use crate::payload::{capitalize, ChartPayload, DiagramPayload};
use crate::samples::{chart_sample, default_chart};
use crate::tabular::{chart_from_table, parse_csv};
use crate::templates::template_for;

/// CSV input goes through the parser and key heuristics; free-form text gets
/// the canned sample for the chart type.
pub fn fallback_chart(data: &str, chart_type: &str, is_csv: bool) -> ChartPayload {
    if !is_csv {
        info!(chart_type, "Using sample data for description input");
        return chart_sample(chart_type);
    }

    match parse_csv(data) {
        Ok(table) => chart_from_table(table, chart_type),
        Err(e) => {
            warn!(chart_type, error = %e, "CSV fallback failed, using default chart");
            default_chart()
        }
    }
}

pub fn fallback_diagram(description: &str, diagram_type: &str) -> DiagramPayload {
    DiagramPayload {
        mermaid_code: template_for(diagram_type, description),
        title: format!("{} Diagram", capitalize(diagram_type)),
        description: format!("Generated {} diagram based on: {}", diagram_type, description),
        diagram_type: diagram_type.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_csv_end_to_end() {
        let payload = fallback_chart("category,value\nA,10\nB,20\nC,15\n", "bar", true);
        let expected = json!({
            "chartData": [
                {"category": "A", "value": 10},
                {"category": "B", "value": 20},
                {"category": "C", "value": 15}
            ],
            "config": {"xKey": "category", "yKey": "value"},
            "title": "Bar Chart",
            "description": "Visualization of category, value data",
            "insights": "Chart shows relationship between category and value. Data contains 3 records."
        });
        assert_eq!(serde_json::to_value(&payload).unwrap(), expected);
    }

    #[test]
    fn test_description_input_uses_sample() {
        let payload = fallback_chart("sales went up in spring", "line", false);
        assert_eq!(payload, chart_sample("line"));
    }

    #[test]
    fn test_bad_csv_gets_default_chart() {
        let payload = fallback_chart("just a header", "bar", true);
        assert_eq!(payload, default_chart());
    }

    #[test]
    fn test_diagram_fallback_fields() {
        let payload = fallback_diagram("Customer onboarding flow", "mindmap");
        assert_eq!(payload.title, "Mindmap Diagram");
        assert_eq!(payload.diagram_type, "mindmap");
        assert_eq!(
            payload.description,
            "Generated mindmap diagram based on: Customer onboarding flow"
        );
        assert!(payload.mermaid_code.contains("root((Customer onboarding))"));
    }

    #[test]
    fn test_unknown_diagram_type_keeps_requested_name() {
        let payload = fallback_diagram("x", "venn");
        assert_eq!(payload.diagram_type, "venn");
        assert_eq!(payload.title, "Venn Diagram");
        assert!(payload.mermaid_code.starts_with("graph TD"));
    }
}
