//! Canned chart datasets
//!
//! Used when a chart is requested from a free-form description and no model
//! is available. Output depends only on the chart type.

use serde_json::{json, Value};

use crate::payload::{ChartConfig, ChartPayload, ChartType, DataPoint};

/// Sample payload for a chart type; unknown types get a generic label/value set.
pub fn chart_sample(chart_type: &str) -> ChartPayload {
    match chart_type.parse::<ChartType>().ok() {
        Some(ChartType::Bar) => ChartPayload {
            chart_data: labeled(
                "category",
                &[
                    ("Category A", 100),
                    ("Category B", 200),
                    ("Category C", 150),
                    ("Category D", 300),
                ],
            ),
            config: ChartConfig::new("category", "value"),
            title: "Sample Bar Chart".into(),
            description: "Sample bar chart data".into(),
            insights: "Category D has the highest value, followed by Category B.".into(),
        },
        Some(ChartType::Line) => ChartPayload {
            chart_data: labeled(
                "month",
                &[
                    ("Jan", 100),
                    ("Feb", 120),
                    ("Mar", 140),
                    ("Apr", 160),
                    ("May", 180),
                    ("Jun", 200),
                ],
            ),
            config: ChartConfig::new("month", "value"),
            title: "Sample Line Chart".into(),
            description: "Monthly trend data".into(),
            insights: "Values show a steady increasing trend over the months.".into(),
        },
        Some(ChartType::Pie) => ChartPayload {
            chart_data: labeled(
                "name",
                &[
                    ("Segment A", 30),
                    ("Segment B", 40),
                    ("Segment C", 20),
                    ("Segment D", 10),
                ],
            ),
            config: ChartConfig::new("name", "value"),
            title: "Sample Pie Chart".into(),
            description: "Distribution by segment".into(),
            insights: "Segment B represents the largest portion at 40%.".into(),
        },
        Some(ChartType::Area) => ChartPayload {
            chart_data: labeled(
                "period",
                &[
                    ("Week 1", 100),
                    ("Week 2", 150),
                    ("Week 3", 130),
                    ("Week 4", 180),
                    ("Week 5", 220),
                ],
            ),
            config: ChartConfig::new("period", "value"),
            title: "Sample Area Chart".into(),
            description: "Weekly cumulative data".into(),
            insights: "Values show an overall increasing trend with a slight dip in Week 3.".into(),
        },
        Some(ChartType::Scatter) => ChartPayload {
            chart_data: (0..7)
                .map(|i| point([("x", json!(10 + 5 * i)), ("y", json!(20 + 5 * i))]))
                .collect(),
            config: ChartConfig::new("x", "y"),
            title: "Sample Scatter Plot".into(),
            description: "Correlation between X and Y".into(),
            insights: "There appears to be a positive correlation between X and Y variables.".into(),
        },
        Some(ChartType::Trend) => ChartPayload {
            chart_data: labeled(
                "quarter",
                &[
                    ("Q1 2023", 100),
                    ("Q2 2023", 120),
                    ("Q3 2023", 140),
                    ("Q4 2023", 160),
                    ("Q1 2024", 180),
                    ("Q2 2024", 200),
                ],
            ),
            config: ChartConfig::new("quarter", "value"),
            title: "Sample Trend Chart".into(),
            description: "Quarterly trend analysis".into(),
            insights: "Values show a consistent upward trend across all quarters.".into(),
        },
        None => ChartPayload {
            chart_data: labeled(
                "label",
                &[("Item 1", 100), ("Item 2", 200), ("Item 3", 150), ("Item 4", 300)],
            ),
            config: ChartConfig::new("label", "value"),
            title: "Sample Data Visualization".into(),
            description: "Sample data for visualization".into(),
            insights: "Item 4 has the highest value, followed by Item 2.".into(),
        },
    }
}

/// Last-resort payload when CSV input cannot be parsed at all.
pub fn default_chart() -> ChartPayload {
    ChartPayload {
        chart_data: labeled("name", &[("Data 1", 100), ("Data 2", 200), ("Data 3", 150)]),
        config: ChartConfig::new("name", "value"),
        title: "Default Chart".into(),
        description: "Default sample data".into(),
        insights: "Unable to process the provided data. Please check the format and try again."
            .into(),
    }
}

fn labeled(label_key: &str, items: &[(&str, i64)]) -> Vec<DataPoint> {
    items
        .iter()
        .map(|(label, value)| point([(label_key, json!(label)), ("value", json!(value))]))
        .collect()
}

fn point<const N: usize>(fields: [(&str, Value); N]) -> DataPoint {
    fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
