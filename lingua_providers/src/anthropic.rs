use async_trait::async_trait;
use lingua_core::{ChatMessage, LLMProvider, LLMResponse, Usage};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use crate::retry::{RetryPolicy, is_transient, retry_with_backoff};

const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
}

impl AnthropicProvider {
    pub fn new(api_key: String) -> Self {
        info!("Creating AnthropicProvider");
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.anthropic.com".to_string(),
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Bound every request; without this a stalled connection hangs the session.
    pub fn with_timeout(mut self, timeout: Duration) -> anyhow::Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    async fn try_send(&self, request: &serde_json::Value) -> anyhow::Result<LLMResponse> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        parse_response(&response)
    }
}

fn parse_response(response: &serde_json::Value) -> anyhow::Result<LLMResponse> {
    let content = response["content"]
        .as_array()
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|b| b["type"] == "text")
                .and_then(|b| b["text"].as_str())
        })
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing text content"))?
        .to_string();

    let usage = response["usage"].as_object().map(|u| Usage {
        input_tokens: u32::try_from(u["input_tokens"].as_u64().unwrap_or(0)).unwrap_or(0),
        output_tokens: u32::try_from(u["output_tokens"].as_u64().unwrap_or(0)).unwrap_or(0),
    });

    Ok(LLMResponse { content, usage })
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        max_tokens: u32,
    ) -> anyhow::Result<LLMResponse> {
        let request = json!({
            "model": model,
            "max_tokens": max_tokens,
            "messages": messages,
        });

        info!(
            "Sending request to Anthropic API: model={}, messages={}",
            model,
            messages.len()
        );

        let response =
            retry_with_backoff(|| self.try_send(&request), &self.retry, is_transient).await?;

        if let Some(usage) = &response.usage {
            debug!(
                "Tokens: {} input + {} output",
                usage.input_tokens, usage.output_tokens
            );
        }
        info!("Received response from Anthropic API");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_text_block_and_usage() {
        let body = json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "Hello! How are you today?"}],
            "usage": {"input_tokens": 120, "output_tokens": 9}
        });

        let response = parse_response(&body).unwrap();
        assert_eq!(response.content, "Hello! How are you today?");
        let usage = response.usage.unwrap();
        assert_eq!(usage.input_tokens, 120);
        assert_eq!(usage.output_tokens, 9);
    }

    #[test]
    fn missing_text_is_an_error() {
        let body = json!({"content": []});
        assert!(parse_response(&body).is_err());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider =
            AnthropicProvider::new("key".to_string()).with_base_url("http://localhost:9/".into());
        assert_eq!(provider.base_url, "http://localhost:9");
    }
}
