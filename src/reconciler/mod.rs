//! AI Response Reconciler
//!
//! Asks the completion endpoint for a payload and validates what comes back.
//! Per request:
//! 1. No credential: build the fallback payload, never touch the network.
//! 2. Try each configured model in order; the first successful response ends
//!    the loop, even if its content later fails validation.
//! 3. Clean, parse and validate the content. Any failure there, or running
//!    out of models, yields the fallback payload.
//!
//! Callers always get a usable payload back.

pub mod prompts;

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::LLMConfig;
use crate::fallback::{fallback_chart, fallback_diagram};
use crate::llm::{adapter_from_config, LLMAdapter};
use crate::payload::{
    parse_chart_completion, parse_diagram_completion, ChartPayload, DiagramPayload,
};
use crate::types::{AppResult, LLMMessage, LLMRequest};

/// Where a payload came from. Logged, never sent to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    Model(String),
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NotConfigured,
    ModelsExhausted,
    InvalidResponse,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled<T> {
    pub payload: T,
    pub source: PayloadSource,
}

impl<T> Reconciled<T> {
    fn fallback(payload: T, reason: FallbackReason) -> Self {
        Self {
            payload,
            source: PayloadSource::Fallback(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, PayloadSource::Fallback(_))
    }
}

struct Completion {
    model: String,
    content: String,
}

pub struct Reconciler {
    adapter: Option<Arc<dyn LLMAdapter>>,
    models: Vec<String>,
    temperature: f32,
}

impl Reconciler {
    pub fn new(
        adapter: Option<Arc<dyn LLMAdapter>>,
        models: Vec<String>,
        temperature: f32,
    ) -> Self {
        Self {
            adapter,
            models,
            temperature,
        }
    }

    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        Ok(Self::new(
            adapter_from_config(config)?,
            config.models.clone(),
            config.temperature,
        ))
    }

    pub fn is_configured(&self) -> bool {
        self.adapter.is_some()
    }

    pub fn adapter(&self) -> Option<&Arc<dyn LLMAdapter>> {
        self.adapter.as_ref()
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Turn CSV text or a description into a chart payload.
    pub async fn process_data(
        &self,
        data: &str,
        chart_type: &str,
        is_csv: bool,
    ) -> Reconciled<ChartPayload> {
        let Some(adapter) = self.adapter.as_deref() else {
            warn!(chart_type, "XAI_API_KEY not configured, using fallback processing");
            return Reconciled::fallback(
                fallback_chart(data, chart_type, is_csv),
                FallbackReason::NotConfigured,
            );
        };

        let prompt = prompts::chart_prompt(data, chart_type, is_csv);
        let Some(completion) = self.complete(adapter, prompts::CHART_SYSTEM, &prompt).await else {
            return Reconciled::fallback(
                fallback_chart(data, chart_type, is_csv),
                FallbackReason::ModelsExhausted,
            );
        };

        debug!(model = %completion.model, raw = %completion.content, "Raw chart completion");
        match parse_chart_completion(&completion.content) {
            Ok(payload) => {
                info!(model = %completion.model, rows = payload.chart_data.len(), "Chart payload accepted");
                Reconciled {
                    payload,
                    source: PayloadSource::Model(completion.model),
                }
            }
            Err(e) => {
                error!(model = %completion.model, error = %e, "Failed to parse AI response, using fallback");
                Reconciled::fallback(
                    fallback_chart(data, chart_type, is_csv),
                    FallbackReason::InvalidResponse,
                )
            }
        }
    }

    /// Turn a description into Mermaid diagram code. Surrounding whitespace
    /// in the description is ignored.
    pub async fn process_diagram(
        &self,
        description: &str,
        diagram_type: &str,
    ) -> Reconciled<DiagramPayload> {
        let description = description.trim();
        let Some(adapter) = self.adapter.as_deref() else {
            warn!(diagram_type, "XAI_API_KEY not configured, using fallback processing");
            return Reconciled::fallback(
                fallback_diagram(description, diagram_type),
                FallbackReason::NotConfigured,
            );
        };

        let prompt = prompts::diagram_prompt(description, diagram_type);
        let Some(completion) = self.complete(adapter, prompts::DIAGRAM_SYSTEM, &prompt).await else {
            return Reconciled::fallback(
                fallback_diagram(description, diagram_type),
                FallbackReason::ModelsExhausted,
            );
        };

        debug!(model = %completion.model, raw = %completion.content, "Raw diagram completion");
        match parse_diagram_completion(&completion.content, diagram_type) {
            Ok(payload) => {
                info!(model = %completion.model, diagram_type, "Diagram payload accepted");
                Reconciled {
                    payload,
                    source: PayloadSource::Model(completion.model),
                }
            }
            Err(e) => {
                error!(model = %completion.model, error = %e, "Failed to parse AI response, using fallback");
                Reconciled::fallback(
                    fallback_diagram(description, diagram_type),
                    FallbackReason::InvalidResponse,
                )
            }
        }
    }

    /// One attempt per model, in order; stop at the first success.
    async fn complete(
        &self,
        adapter: &dyn LLMAdapter,
        system: &str,
        prompt: &str,
    ) -> Option<Completion> {
        let mut last_error = None;

        for model in &self.models {
            info!(model = %model, "Trying model");

            let request = LLMRequest {
                model: model.clone(),
                messages: vec![LLMMessage::system(system), LLMMessage::user(prompt)],
                max_tokens: None,
                temperature: Some(self.temperature),
            };

            match adapter.create_chat_completion(&request).await {
                Ok(response) => {
                    info!(
                        model = %model,
                        total_tokens = response.usage.total_tokens,
                        "Successfully used model"
                    );
                    return Some(Completion {
                        model: model.clone(),
                        content: response.content,
                    });
                }
                Err(e) => {
                    error!(model = %model, error = %e, "Model attempt failed");
                    last_error = Some(e.to_string());
                }
            }
        }

        warn!(
            last_error = last_error.as_deref().unwrap_or("no models configured"),
            "All models failed, using fallback processing"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppError, LLMResponse, TokenUsage};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned results and records which models were asked.
    struct ScriptedAdapter {
        script: Mutex<VecDeque<AppResult<String>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedAdapter {
        fn new(script: Vec<AppResult<String>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LLMAdapter for ScriptedAdapter {
        async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
            self.calls.lock().unwrap().push(request.model.clone());
            let next = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AppError::LLMApi("script exhausted".into())));
            next.map(|content| LLMResponse {
                content,
                finish_reason: "stop".into(),
                usage: TokenUsage::default(),
            })
        }

        async fn list_models(&self) -> AppResult<Vec<String>> {
            Ok(vec![])
        }
    }

    fn models() -> Vec<String> {
        vec!["grok-3-mini".to_string(), "grok-3".to_string()]
    }

    fn reconciler(adapter: &Arc<ScriptedAdapter>) -> Reconciler {
        let adapter: Arc<dyn LLMAdapter> = adapter.clone();
        Reconciler::new(Some(adapter), models(), 0.1)
    }

    const CSV: &str = "category,value\nA,10\nB,20\nC,15\n";

    const GOOD_CHART: &str = r#"```json
{"processedData":{"chartData":[{"name":"A","value":1}],"config":{"xKey":"name","yKey":"value"},"title":"AI","description":"d","insights":"i"}}
```"#;

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let adapter = ScriptedAdapter::new(vec![Ok(GOOD_CHART.to_string())]);
        let result = reconciler(&adapter).process_data(CSV, "bar", true).await;

        assert_eq!(adapter.calls(), vec!["grok-3-mini"]);
        assert_eq!(result.source, PayloadSource::Model("grok-3-mini".into()));
        assert_eq!(result.payload.title, "AI");
    }

    #[tokio::test]
    async fn test_failure_advances_to_next_model() {
        let adapter = ScriptedAdapter::new(vec![
            Err(AppError::LLMApi("503".into())),
            Ok(GOOD_CHART.to_string()),
        ]);
        let result = reconciler(&adapter).process_data(CSV, "bar", true).await;

        assert_eq!(adapter.calls(), vec!["grok-3-mini", "grok-3"]);
        assert_eq!(result.source, PayloadSource::Model("grok-3".into()));
    }

    #[tokio::test]
    async fn test_exhausted_models_fall_back() {
        let adapter = ScriptedAdapter::new(vec![
            Err(AppError::LLMApi("500".into())),
            Err(AppError::LLMApi("timeout".into())),
        ]);
        let result = reconciler(&adapter).process_data(CSV, "bar", true).await;

        assert_eq!(adapter.calls().len(), 2);
        assert_eq!(result.source, PayloadSource::Fallback(FallbackReason::ModelsExhausted));
        assert_eq!(result.payload, fallback_chart(CSV, "bar", true));
    }

    #[tokio::test]
    async fn test_invalid_json_falls_back_without_retrying() {
        let adapter = ScriptedAdapter::new(vec![
            Ok("Sure! Here is your chart.".to_string()),
            Ok(GOOD_CHART.to_string()),
        ]);
        let result = reconciler(&adapter).process_data(CSV, "bar", true).await;

        assert_eq!(adapter.calls(), vec!["grok-3-mini"]);
        assert_eq!(result.source, PayloadSource::Fallback(FallbackReason::InvalidResponse));
        assert_eq!(result.payload, fallback_chart(CSV, "bar", true));
    }

    #[tokio::test]
    async fn test_structurally_invalid_chart_falls_back() {
        let adapter = ScriptedAdapter::new(vec![Ok(r#"{"chartData":"nope"}"#.to_string())]);
        let result = reconciler(&adapter).process_data("monthly sales", "pie", false).await;

        assert!(result.is_fallback());
        assert_eq!(result.payload, fallback_chart("monthly sales", "pie", false));
    }

    #[tokio::test]
    async fn test_non_scalar_rows_and_unknown_axes_fall_back() {
        let completions = [
            r#"{"chartData":[{"k":{"nested":true},"v":null},{"k":[1,2],"v":false}],"config":{"xKey":"k","yKey":"v"}}"#,
            r#"{"chartData":[{"a":"x","b":1}],"config":{"xKey":"nope","yKey":"missing"}}"#,
        ];

        for raw in completions {
            let adapter =
                ScriptedAdapter::new(vec![Ok(raw.to_string()), Ok(GOOD_CHART.to_string())]);
            let result = reconciler(&adapter).process_data(CSV, "line", true).await;

            assert_eq!(adapter.calls(), vec!["grok-3-mini"]);
            assert_eq!(result.source, PayloadSource::Fallback(FallbackReason::InvalidResponse));
            assert_eq!(result.payload, fallback_chart(CSV, "line", true));
        }
    }

    #[tokio::test]
    async fn test_diagram_description_is_trimmed() {
        let reconciler = Reconciler::new(None, models(), 0.1);
        let result = reconciler.process_diagram("  Project planning phases\n", "mindmap").await;

        assert_eq!(result.payload, fallback_diagram("Project planning phases", "mindmap"));
        assert_eq!(
            result.payload.description,
            "Generated mindmap diagram based on: Project planning phases"
        );
    }

    #[tokio::test]
    async fn test_not_configured_never_calls_out() {
        let reconciler = Reconciler::new(None, models(), 0.1);
        assert!(!reconciler.is_configured());

        let chart = reconciler.process_data(CSV, "bar", true).await;
        assert_eq!(chart.source, PayloadSource::Fallback(FallbackReason::NotConfigured));
        assert_eq!(chart.payload, fallback_chart(CSV, "bar", true));

        let diagram = reconciler.process_diagram("Team structure", "orgchart").await;
        assert_eq!(diagram.payload, fallback_diagram("Team structure", "orgchart"));
    }

    #[tokio::test]
    async fn test_from_config_without_key_is_unconfigured() {
        let reconciler = Reconciler::from_config(&LLMConfig::default()).unwrap();
        assert!(!reconciler.is_configured());
        assert_eq!(reconciler.models(), ["grok-3-mini", "grok-3"]);
    }

    #[tokio::test]
    async fn test_diagram_from_model() {
        let adapter = ScriptedAdapter::new(vec![Ok(
            r#"{"mermaidCode":"sequenceDiagram\n  A->>B: hi","title":"Hello"}"#.to_string(),
        )]);
        let result = reconciler(&adapter).process_diagram("greeting", "sequence").await;

        assert_eq!(result.source, PayloadSource::Model("grok-3-mini".into()));
        assert_eq!(result.payload.diagram_type, "sequence");
        assert!(result.payload.mermaid_code.starts_with("sequenceDiagram"));
    }

    #[tokio::test]
    async fn test_diagram_without_code_falls_back() {
        let adapter =
            ScriptedAdapter::new(vec![Ok(r#"{"processedData":{"title":"x"}}"#.to_string())]);
        let result = reconciler(&adapter).process_diagram("", "mindmap").await;

        assert_eq!(result.source, PayloadSource::Fallback(FallbackReason::InvalidResponse));
        assert!(result.payload.mermaid_code.contains("root((Main Topic))"));
    }

    #[tokio::test]
    async fn test_prompt_is_sent_with_system_message() {
        struct Capture(Mutex<Option<LLMRequest>>);

        #[async_trait]
        impl LLMAdapter for Capture {
            async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
                *self.0.lock().unwrap() = Some(request.clone());
                Err(AppError::LLMApi("offline".into()))
            }

            async fn list_models(&self) -> AppResult<Vec<String>> {
                Ok(vec![])
            }
        }

        let capture = Arc::new(Capture(Mutex::new(None)));
        let adapter: Arc<dyn LLMAdapter> = capture.clone();
        Reconciler::new(Some(adapter), vec!["only".into()], 0.1)
            .process_data("x,y\n1,2", "scatter", true)
            .await;

        let request = capture.0.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "only");
        assert_eq!(request.messages[0], LLMMessage::system(prompts::CHART_SYSTEM));
        assert_eq!(request.messages[1].role, "user");
        assert!(request.messages[1].content.contains("scatter chart"));
        assert_eq!(request.temperature, Some(0.1));
    }
}
