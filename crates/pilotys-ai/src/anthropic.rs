//! Anthropic messages backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DEFAULT_ANTHROPIC_BASE_URL;
use crate::error::LlmError;
use crate::provider::{LlmProvider, read_json};

const NAME: &str = "anthropic";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4000;

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

pub struct AnthropicProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl AnthropicProvider {
    pub fn new(api_key: String, model: String, temperature: f32) -> Self {
        Self::with_client(
            reqwest::Client::new(),
            DEFAULT_ANTHROPIC_BASE_URL,
            api_key,
            model,
            temperature,
        )
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        api_key: String,
        model: String,
        temperature: f32,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            temperature,
        }
    }

    fn request_body<'a>(&'a self, system: &'a str, prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: self.temperature,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        }
    }
}

/// Text blocks are concatenated; the model may split its answer.
fn completion_text(response: MessagesResponse) -> Result<String, LlmError> {
    let text: String = response
        .content
        .into_iter()
        .filter_map(|block| block.text)
        .collect();
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse(NAME));
    }
    Ok(text)
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/messages", self.base_url);
        debug!(url = %url, model = %self.model, "requesting Anthropic completion");

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request_body(system, prompt))
            .send()
            .await?;
        let response: MessagesResponse = read_json(NAME, resp).await?;
        completion_text(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_shape() {
        let p = AnthropicProvider::new("sk-ant".into(), "claude-3-5-sonnet-20241022".into(), 0.1);
        assert_eq!(p.base_url, "https://api.anthropic.com/v1");

        let body = serde_json::to_value(p.request_body("Système", "Texte")).unwrap();
        assert_eq!(body["model"], "claude-3-5-sonnet-20241022");
        assert_eq!(body["max_tokens"], 4000);
        assert_eq!(body["system"], "Système");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Texte");
    }

    #[test]
    fn joins_text_blocks() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"{\"a\":"},{"type":"text","text":"1}"}]}"#,
        )
        .unwrap();
        assert_eq!(completion_text(response).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn empty_content_is_an_error() {
        let response: MessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(matches!(completion_text(response), Err(LlmError::EmptyResponse("anthropic"))));
    }
}
