//! Chat-completion backends behind one trait.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::anthropic::AnthropicProvider;
use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::openai::OpenAiProvider;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// `false` means analysis should go straight to the fallback.
    fn is_configured(&self) -> bool {
        true
    }

    /// Send one system + user prompt pair and return the raw completion text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

/// Stands in when no credential is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProvider;

#[async_trait]
impl LlmProvider for NullProvider {
    fn name(&self) -> &'static str {
        "none"
    }

    fn is_configured(&self) -> bool {
        false
    }

    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::NotConfigured)
    }
}

/// Pick the backend for `config`, sharing `client` for HTTP.
pub fn provider_from_config(config: &LlmConfig, client: reqwest::Client) -> Box<dyn LlmProvider> {
    // Same precedence as `LlmConfig::provider_kind`.
    let provider: Box<dyn LlmProvider> = match (&config.openai_api_key, &config.anthropic_api_key) {
        (Some(key), _) => Box::new(OpenAiProvider::with_client(
            client,
            &config.openai_base_url,
            key.clone(),
            config.openai_model.clone(),
            config.temperature,
        )),
        (None, Some(key)) => Box::new(AnthropicProvider::with_client(
            client,
            &config.anthropic_base_url,
            key.clone(),
            config.anthropic_model.clone(),
            config.temperature,
        )),
        (None, None) => Box::new(NullProvider),
    };
    info!(provider = provider.name(), "LLM provider selected");
    provider
}

/// Decode a 2xx JSON body; any other status becomes [`LlmError::Server`]
/// carrying the response text.
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &'static str,
    resp: reqwest::Response,
) -> Result<T, LlmError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(LlmError::Server {
            provider,
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp.json().await?)
}
