//! # Blogsmith Models
//!
//! Centralized LLM configuration types shared by the worker skills and
//! the pipeline coordinator. Each generation request builds fresh
//! per-role configs from these; nothing here is persisted.

use radkit::models::providers::{AnthropicLlm, OpenAILlm, OpenRouterLlm};
use radkit::models::BaseLlm;
use serde::{Deserialize, Serialize};

/// Supported LLM providers
///
/// API keys are loaded from environment variables:
/// - Anthropic (Claude) - `ANTHROPIC_API_KEY`
/// - OpenAI (GPT) - `OPENAI_API_KEY`
/// - OpenRouter (Gateway) - `OPENROUTER_API_KEY`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Anthropic,
    #[serde(rename = "openai")]
    OpenAI,
    OpenRouter,
}

impl LlmProvider {
    /// Get all available providers
    pub fn all() -> Vec<LlmProvider> {
        vec![
            LlmProvider::Anthropic,
            LlmProvider::OpenAI,
            LlmProvider::OpenRouter,
        ]
    }

    /// Display name for API consumers
    pub fn display_name(&self) -> &'static str {
        match self {
            LlmProvider::Anthropic => "Anthropic",
            LlmProvider::OpenAI => "OpenAI",
            LlmProvider::OpenRouter => "OpenRouter",
        }
    }

    /// Default model when no override is configured
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Anthropic => "claude-sonnet-4-20250514",
            LlmProvider::OpenAI => "gpt-4o",
            LlmProvider::OpenRouter => "anthropic/claude-3.5-sonnet",
        }
    }

    /// Environment variable holding the provider's API key
    pub fn env_var(&self) -> &'static str {
        match self {
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    /// Whether this provider supports custom base URL
    pub fn supports_base_url(&self) -> bool {
        matches!(self, LlmProvider::OpenAI)
    }
}

/// Configuration for LLM model selection
///
/// Used throughout the Blogsmith pipeline to pick which provider and
/// model a worker role runs on. Supports per-role overrides via
/// `PipelineConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// LLM provider to use
    #[serde(default)]
    pub provider: LlmProvider,
    /// Model name (e.g., "claude-sonnet-4-20250514", "gpt-4o")
    pub model: String,
    /// Optional base URL override for OpenAI-compatible APIs
    pub base_url: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Anthropic,
            model: LlmProvider::Anthropic.default_model().to_string(),
            base_url: None,
        }
    }
}

impl ModelConfig {
    /// Create a new model config with the default provider (Anthropic)
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            provider: LlmProvider::Anthropic,
            model: model.into(),
            base_url: None,
        }
    }

    /// Create config for a specific provider
    pub fn with_provider(provider: LlmProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            base_url: None,
        }
    }

    /// Set base URL (for OpenAI-compatible endpoints)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Create an LLM client based on the configured provider
    ///
    /// Each provider uses `from_env()` to load API keys from
    /// environment variables.
    pub fn create_llm(&self) -> anyhow::Result<Box<dyn BaseLlm + Send + Sync>> {
        match self.provider {
            LlmProvider::Anthropic => Ok(Box::new(AnthropicLlm::from_env(&self.model)?)),
            LlmProvider::OpenAI => {
                let llm = if let Some(base_url) = &self.base_url {
                    OpenAILlm::from_env(&self.model)?.with_base_url(base_url)
                } else {
                    OpenAILlm::from_env(&self.model)?
                };
                Ok(Box::new(llm))
            }
            LlmProvider::OpenRouter => Ok(Box::new(OpenRouterLlm::from_env(&self.model)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ModelConfig::default();
        assert_eq!(config.provider, LlmProvider::Anthropic);
        assert!(config.model.contains("claude"));
    }

    #[test]
    fn test_provider_display_names() {
        assert_eq!(LlmProvider::Anthropic.display_name(), "Anthropic");
        assert_eq!(LlmProvider::OpenRouter.display_name(), "OpenRouter");
    }

    #[test]
    fn test_base_url_support() {
        assert!(LlmProvider::OpenAI.supports_base_url());
        assert!(!LlmProvider::Anthropic.supports_base_url());
    }

    #[test]
    fn test_model_config_serialization() {
        let config = ModelConfig::with_provider(LlmProvider::OpenAI, "gpt-4o");
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("openai"));
        assert!(json.contains("gpt-4o"));
    }
}
