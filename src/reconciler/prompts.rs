//! Prompt text for the completion endpoint

pub const CHART_SYSTEM: &str = "You are a data processing expert that converts raw data into chart-ready formats. Always respond with valid JSON only.";

pub const DIAGRAM_SYSTEM: &str = "You are a Mermaid diagram expert that creates valid diagram syntax. Always respond with valid JSON only.";

pub fn chart_prompt(data: &str, chart_type: &str, is_csv: bool) -> String {
    let label = if is_csv { "CSV Data:" } else { "User Description:" };

    format!(
        r#"You are a data processing expert. I need you to process the following data for a {chart_type} chart.

{label}
{data}

Please return a JSON response with the following structure:
{{
  "processedData": {{
    "chartData": [array of objects with consistent keys],
    "config": {{
      "xKey": "string - the key for x-axis data",
      "yKey": "string - the key for y-axis data"
    }},
    "title": "string - descriptive title for the chart",
    "description": "string - brief description of the data",
    "insights": "string - key insights from the data"
  }}
}}

Requirements:
1. For {chart_type} charts, ensure the data format is appropriate
2. Convert all data to proper types (numbers for values, strings for labels)
3. Handle missing or invalid data gracefully
4. Provide meaningful insights about the data patterns
5. Ensure the chartData array has consistent object structure
6. For pie charts, make sure each object has a name and value field
7. For other charts, ensure x and y axis data is properly formatted

Return ONLY the JSON response, no additional text."#
    )
}

pub fn diagram_prompt(description: &str, diagram_type: &str) -> String {
    let requirements = if diagram_type == "sequence" {
        r#"- Use "sequenceDiagram" as the first line
- Define participants with "participant Name as DisplayName"
- Use arrows: ->> for sync calls, -->> for responses, -x for async
- Use proper syntax: "ParticipantA->>ParticipantB: Message"
- No numbers or special characters in participant names
- Keep messages clear and concise"#
            .to_string()
    } else {
        format!(
            "- Generate valid Mermaid syntax for a {diagram_type}
- Make sure the syntax is correct and will render properly
- Include appropriate labels and connections
- Keep the diagram clear and well-organized
- Use proper Mermaid syntax for {diagram_type} diagrams"
        )
    };

    format!(
        r#"You are a Mermaid diagram expert. I need you to create a {diagram_type} diagram based on this description:

Description: {description}

Please return a JSON response with the following structure:
{{
  "processedData": {{
    "mermaidCode": "string - valid Mermaid syntax for the diagram",
    "title": "string - descriptive title for the diagram",
    "description": "string - brief description of what the diagram shows",
    "diagramType": "{diagram_type}"
  }}
}}

Requirements for {diagram_type} diagrams:
{requirements}

Return ONLY the JSON response, no additional text."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_prompt_labels_input() {
        let csv = chart_prompt("a,b\n1,2", "bar", true);
        assert!(csv.contains("for a bar chart"));
        assert!(csv.contains("CSV Data:\na,b\n1,2"));
        assert!(csv.contains("\"processedData\": {"));

        let text = chart_prompt("sales by month", "line", false);
        assert!(text.contains("User Description:\nsales by month"));
    }

    #[test]
    fn test_diagram_prompt_sequence_rules() {
        let seq = diagram_prompt("login flow", "sequence");
        assert!(seq.contains("Use \"sequenceDiagram\" as the first line"));
        assert!(seq.contains("\"diagramType\": \"sequence\""));

        let flow = diagram_prompt("login flow", "flowchart");
        assert!(flow.contains("Generate valid Mermaid syntax for a flowchart"));
        assert!(!flow.contains("sequenceDiagram"));
    }
}
