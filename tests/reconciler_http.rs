use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Server};
use serde_json::json;

use rechart::config::LLMConfig;
use rechart::fallback::{fallback_chart, fallback_diagram};
use rechart::llm::{LLMAdapter, XaiAdapter};
use rechart::reconciler::{FallbackReason, PayloadSource, Reconciler};

const CSV: &str = "Name,Score\nAlice,10\nBob,20";

fn completion(content: &str) -> String {
    json!({
        "id": "cmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 34, "total_tokens": 46}
    })
    .to_string()
}

fn reconciler_for(server: &Server) -> Reconciler {
    let adapter = XaiAdapter::new("test-key", &server.url(), Duration::from_secs(5)).unwrap();
    Reconciler::new(
        Some(Arc::new(adapter)),
        vec!["grok-3-mini".to_string(), "grok-3".to_string()],
        0.1,
    )
}

#[tokio::test]
async fn first_model_success_short_circuits() {
    let mut server = Server::new_async().await;
    let content = r#"```json
{"processedData": {"chartData": [{"month": "Jan", "sales": 5}], "config": {"xKey": "month", "yKey": "sales"}, "title": "Sales", "description": "Monthly", "insights": "Flat"}}
```"#;

    let first = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({"model": "grok-3-mini", "stream": false})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(content))
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"model": "grok-3"})))
        .expect(0)
        .create_async()
        .await;

    let result = reconciler_for(&server).process_data("month,sales\nJan,5", "bar", true).await;

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(result.source, PayloadSource::Model("grok-3-mini".to_string()));
    assert_eq!(result.payload.title, "Sales");
    assert_eq!(result.payload.config.x_key, "month");
    assert_eq!(result.payload.chart_data[0].get("sales"), Some(&json!(5)));
}

#[tokio::test]
async fn failed_model_advances_to_next() {
    let mut server = Server::new_async().await;
    let content = json!({
        "mermaidCode": "flowchart TD\n  A --> B",
        "title": "Deploy",
        "description": "Pipeline"
    })
    .to_string();

    let first = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"model": "grok-3-mini"})))
        .with_status(503)
        .with_body("overloaded")
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"model": "grok-3"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(&content))
        .expect(1)
        .create_async()
        .await;

    let result = reconciler_for(&server).process_diagram("deploy pipeline", "flowchart").await;

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(result.source, PayloadSource::Model("grok-3".to_string()));
    assert_eq!(result.payload.mermaid_code, "flowchart TD\n  A --> B");
    assert_eq!(result.payload.diagram_type, "flowchart");
}

#[tokio::test]
async fn all_models_failing_yields_fallback() {
    let mut server = Server::new_async().await;
    let failing = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .expect(2)
        .create_async()
        .await;

    let result = reconciler_for(&server).process_data(CSV, "line", true).await;

    failing.assert_async().await;
    assert_eq!(result.source, PayloadSource::Fallback(FallbackReason::ModelsExhausted));
    assert_eq!(result.payload, fallback_chart(CSV, "line", true));
}

#[tokio::test]
async fn unparseable_content_falls_back_without_retry() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion("Sure! Here is your chart."))
        .expect(1)
        .create_async()
        .await;

    let result = reconciler_for(&server).process_data(CSV, "bar", true).await;

    mock.assert_async().await;
    assert_eq!(result.source, PayloadSource::Fallback(FallbackReason::InvalidResponse));
    assert_eq!(result.payload, fallback_chart(CSV, "bar", true));
}

#[tokio::test]
async fn missing_mermaid_code_falls_back() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(r#"{"title": "No code here"}"#))
        .expect(1)
        .create_async()
        .await;

    let result = reconciler_for(&server).process_diagram("org", "orgchart").await;

    mock.assert_async().await;
    assert!(result.is_fallback());
    assert_eq!(result.payload, fallback_diagram("org", "orgchart"));
}

#[tokio::test]
async fn no_credential_never_calls_the_api() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let config = LLMConfig {
        xai_api_key: Some("  ".to_string()),
        api_base: server.url(),
        ..LLMConfig::default()
    };
    let reconciler = Reconciler::from_config(&config).unwrap();
    assert!(!reconciler.is_configured());

    let result = reconciler.process_data(CSV, "bar", true).await;

    mock.assert_async().await;
    assert_eq!(result.source, PayloadSource::Fallback(FallbackReason::NotConfigured));
    assert_eq!(
        serde_json::to_value(&result.payload).unwrap(),
        json!({
            "chartData": [{"Name": "Alice", "Score": 10}, {"Name": "Bob", "Score": 20}],
            "config": {"xKey": "Name", "yKey": "Score"},
            "title": "Bar Chart",
            "description": "Visualization of Name, Score data",
            "insights": "Chart shows relationship between Name and Score. Data contains 2 records."
        })
    );
}

#[tokio::test]
async fn list_models_reads_ids() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/models")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "object": "list",
                "data": [
                    {"id": "grok-3", "object": "model"},
                    {"id": "grok-3-mini", "object": "model"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let adapter = XaiAdapter::new("test-key", &server.url(), Duration::from_secs(5)).unwrap();
    let models = adapter.list_models().await.unwrap();

    mock.assert_async().await;
    assert_eq!(models, vec!["grok-3", "grok-3-mini"]);
}
