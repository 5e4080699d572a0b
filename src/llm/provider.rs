use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LLMConfig;
use crate::types::{AppResult, LLMRequest, LLMResponse};

/// A chat-completion backend.
#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;

    /// Model ids the backend advertises.
    async fn list_models(&self) -> AppResult<Vec<String>>;
}

/// Build the configured adapter, or `None` when no credential is set.
pub fn adapter_from_config(config: &LLMConfig) -> AppResult<Option<Arc<dyn LLMAdapter>>> {
    match config.api_key() {
        Some(key) => {
            let adapter =
                crate::llm::xai::XaiAdapter::new(key, &config.api_base, config.timeout())?;
            Ok(Some(Arc::new(adapter)))
        }
        None => Ok(None),
    }
}
