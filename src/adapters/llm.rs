use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_name: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: usize,
    pub max_retries: usize,
    pub request_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_name: "gemini-1.5-flash".to_string(),
            api_key: None,
            base_url: None,
            temperature: 0.2,
            max_tokens: 2048,
            max_retries: 2,
            request_timeout_secs: 120,
        }
    }
}

impl ModelConfig {
    // every attempt plus its retries has to fit inside the per-unit budget
    pub fn attempt_timeout(&self) -> Duration {
        let attempts = self.max_retries as u64 + 1;
        Duration::from_secs((self.request_timeout_secs / attempts).max(1))
    }
}

#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
    fn model_name(&self) -> &str;
}

pub fn create_generator(config: &ModelConfig) -> Result<Box<dyn Generator>> {
    Ok(Box::new(crate::adapters::GeminiAdapter::new(config.clone())?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_timeout_splits_unit_budget() {
        let config = ModelConfig {
            request_timeout_secs: 120,
            max_retries: 2,
            ..ModelConfig::default()
        };
        assert_eq!(config.attempt_timeout(), Duration::from_secs(40));

        let no_retries = ModelConfig {
            request_timeout_secs: 30,
            max_retries: 0,
            ..ModelConfig::default()
        };
        assert_eq!(no_retries.attempt_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_attempt_timeout_never_zero() {
        let config = ModelConfig {
            request_timeout_secs: 1,
            max_retries: 5,
            ..ModelConfig::default()
        };
        assert_eq!(config.attempt_timeout(), Duration::from_secs(1));
    }
}
