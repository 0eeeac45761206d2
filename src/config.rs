use crate::adapters::llm::ModelConfig;
use crate::core::chunker::DEFAULT_MAX_CHUNK_SIZE;
use crate::core::pipeline::{FailurePolicy, PipelineConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const CONFIG_FILE_NAMES: &[&str] = &[".prlens.yml", ".prlens.yaml"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("GitHub token not provided. Set the GITHUB_TOKEN environment variable or use the --token flag")]
    MissingGithubToken,
    #[error("Gemini API key not found. Set the GEMINI_API_KEY environment variable or api_key in .prlens.yml")]
    MissingApiKey,
    #[error("No model configured. Set model in .prlens.yml or pass --model")]
    MissingModel,
    #[error("max_chunk_size must be greater than zero")]
    InvalidChunkSize,
    #[error("concurrency must be at least 1")]
    InvalidConcurrency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    pub api_key: Option<String>,
    pub base_url: Option<String>,

    pub github_token: Option<String>,
    pub github_api_url: Option<String>,

    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,

    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    #[serde(default)]
    pub on_failure: FailurePolicy,

    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
            github_token: None,
            github_api_url: None,
            max_chunk_size: default_max_chunk_size(),
            concurrency: default_concurrency(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            on_failure: FailurePolicy::default(),
            exclude: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub model: Option<String>,
    pub github_token: Option<String>,
    pub max_chunk_size: Option<usize>,
    pub concurrency: Option<usize>,
    pub on_failure: Option<FailurePolicy>,
}

impl Config {
    pub fn load() -> Result<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = PathBuf::from(name);
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(CONFIG_FILE_NAMES[0]);
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Config::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn merge_with_cli(&mut self, overrides: CliOverrides) {
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if let Some(token) = overrides.github_token {
            self.github_token = Some(token);
        }
        if let Some(size) = overrides.max_chunk_size {
            self.max_chunk_size = size;
        }
        if let Some(concurrency) = overrides.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(policy) = overrides.on_failure {
            self.on_failure = policy;
        }
    }

    pub fn apply_env(&mut self) {
        if self.github_token.is_none() {
            self.github_token = non_empty_env(crate::adapters::github::TOKEN_ENV);
        }
        if self.api_key.is_none() {
            self.api_key = non_empty_env(crate::adapters::gemini::API_KEY_ENV);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::MissingModel);
        }
        if self.max_chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }
        Ok(())
    }

    pub fn validate_for_review(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if is_blank(&self.github_token) {
            return Err(ConfigError::MissingGithubToken);
        }
        if is_blank(&self.api_key) {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }

    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            model_name: self.model.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            max_retries: self.max_retries,
            request_timeout_secs: self.request_timeout_secs,
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            concurrency: self.concurrency,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            failure_policy: self.on_failure,
        }
    }

    pub fn exclude_patterns(&self) -> Vec<glob::Pattern> {
        self.exclude
            .iter()
            .filter_map(|raw| match glob::Pattern::new(raw) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Ignoring invalid exclude pattern {:?}: {}", raw, e);
                    None
                }
            })
            .collect()
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> usize {
    2048
}

fn default_max_chunk_size() -> usize {
    DEFAULT_MAX_CHUNK_SIZE
}

fn default_concurrency() -> usize {
    4
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_max_retries() -> usize {
    2
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn with_credentials() -> Config {
        Config {
            github_token: Some("ghp_token".to_string()),
            api_key: Some("gemini-key".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.max_chunk_size, 4000);
        assert_eq!(config.on_failure, FailurePolicy::Placeholder);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file_fills_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "model: gemini-1.5-pro\nmax_chunk_size: 2500\non_failure: abort\nexclude:\n  - \"*.lock\"\n  - \"vendor/**\""
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.max_chunk_size, 2500);
        assert_eq!(config.on_failure, FailurePolicy::Abort);
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.request_timeout_secs, 120);

        let patterns = config.exclude_patterns();
        assert_eq!(patterns.len(), 2);
        assert!(patterns[0].matches("Cargo.lock"));
        assert!(patterns[1].matches("vendor/lib/x.go"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_chunk_size: [not a number").unwrap();
        assert!(Config::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = Config::default();
        config.merge_with_cli(CliOverrides {
            model: Some("gemini-2.0-flash".to_string()),
            max_chunk_size: Some(1000),
            on_failure: Some(FailurePolicy::Abort),
            ..CliOverrides::default()
        });

        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.max_chunk_size, 1000);
        assert_eq!(config.on_failure, FailurePolicy::Abort);
        assert_eq!(config.concurrency, 4);
    }

    #[test]
    fn test_review_requires_credentials() {
        assert!(with_credentials().validate_for_review().is_ok());

        let no_token = Config {
            github_token: None,
            ..with_credentials()
        };
        assert_eq!(no_token.validate_for_review(), Err(ConfigError::MissingGithubToken));

        let blank_key = Config {
            api_key: Some("  ".to_string()),
            ..with_credentials()
        };
        assert_eq!(blank_key.validate_for_review(), Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn test_rejects_unusable_limits() {
        let zero_chunk = Config {
            max_chunk_size: 0,
            ..with_credentials()
        };
        assert_eq!(zero_chunk.validate(), Err(ConfigError::InvalidChunkSize));

        let zero_workers = Config {
            concurrency: 0,
            ..with_credentials()
        };
        assert_eq!(zero_workers.validate(), Err(ConfigError::InvalidConcurrency));

        let no_model = Config {
            model: " ".to_string(),
            ..with_credentials()
        };
        assert_eq!(no_model.validate_for_review(), Err(ConfigError::MissingModel));
    }

    #[test]
    fn test_derived_configs() {
        let config = Config {
            request_timeout_secs: 30,
            concurrency: 2,
            ..with_credentials()
        };
        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.request_timeout, Duration::from_secs(30));
        assert_eq!(pipeline.concurrency, 2);

        let model = config.model_config();
        assert_eq!(model.model_name, "gemini-1.5-flash");
        assert_eq!(model.api_key.as_deref(), Some("gemini-key"));

        // retries share the unit timeout instead of each getting their own
        assert_eq!(model.request_timeout_secs, 30);
        assert_eq!(model.attempt_timeout(), Duration::from_secs(10));
    }
}
