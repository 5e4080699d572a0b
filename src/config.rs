use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::time::Duration;

pub const DEFAULT_XAI_API_BASE: &str = "https://api.x.ai/v1";
pub const DEFAULT_MODELS: [&str; 2] = ["grok-3-mini", "grok-3"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LLMConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub xai_api_key: Option<String>,
    pub api_base: String,
    /// Tried in order; the first successful completion wins.
    pub models: Vec<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl LLMConfig {
    /// The credential, if one is actually set. Blank keys count as missing.
    pub fn api_key(&self) -> Option<&str> {
        self.xai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            xai_api_key: None,
            api_base: DEFAULT_XAI_API_BASE.to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            temperature: 0.1,
            timeout_secs: 30,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            public_base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            min_connections: 1,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: split_list(
                    &env::var("ALLOWED_ORIGINS")
                        .unwrap_or_else(|_| "http://localhost:3000".to_string()),
                ),
                public_base_url: env::var("PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string())
                    .trim_end_matches('/')
                    .to_string(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty()),
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()?,
                min_connections: env::var("DB_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()?,
            },
            llm: LLMConfig {
                xai_api_key: env::var("XAI_API_KEY").ok(),
                api_base: env::var("XAI_API_BASE")
                    .unwrap_or_else(|_| DEFAULT_XAI_API_BASE.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                models: env::var("XAI_MODELS")
                    .map(|m| split_list(&m))
                    .ok()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()),
                temperature: env::var("LLM_TEMPERATURE")
                    .unwrap_or_else(|_| "0.1".to_string())
                    .parse()?,
                timeout_secs: env::var("LLM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()?,
            },
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_not_configured() {
        let mut llm = LLMConfig::default();
        assert!(!llm.is_configured());

        llm.xai_api_key = Some("   ".to_string());
        assert!(!llm.is_configured());

        llm.xai_api_key = Some(" xai-123 ".to_string());
        assert_eq!(llm.api_key(), Some("xai-123"));
    }

    #[test]
    fn test_default_models_in_priority_order() {
        let llm = LLMConfig::default();
        assert_eq!(llm.models, vec!["grok-3-mini", "grok-3"]);
        assert_eq!(llm.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
