use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::errors::ReportError;
use super::provider::{check_status, LLMProvider};
use super::types::LLMResponse;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(api_key: &str, model: Option<&str>, base_url: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.unwrap_or("claude-3-5-haiku-20241022").to_string(),
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<LLMResponse, ReportError> {
        let body = json!({
            "model": self.model,
            "max_tokens": max_tokens,
            "messages": [{"role": "user", "content": prompt}]
        });

        let resp = self.client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| ReportError::Network(format!("Anthropic API request failed: {}", e)))?;

        let status = resp.status();
        let text = resp.text().await
            .map_err(|e| ReportError::Network(format!("Anthropic response read failed: {}", e)))?;
        check_status("Anthropic", status, &text)?;

        let data: Value = serde_json::from_str(&text)
            .map_err(|e| ReportError::LLMApi(format!("Failed to parse Anthropic response: {}", e)))?;

        if let Some(error) = data.get("error") {
            let msg = error["message"].as_str().unwrap_or("Unknown error");
            return Err(ReportError::LLMApi(msg.to_string()));
        }

        let content: String = data["content"].as_array()
            .ok_or_else(|| ReportError::LLMApi("No content in Anthropic response".into()))?
            .iter()
            .filter(|block| block["type"] == "text")
            .filter_map(|block| block["text"].as_str())
            .collect::<Vec<_>>()
            .join("");

        Ok(LLMResponse {
            content,
            input_tokens: data["usage"]["input_tokens"].as_u64(),
            output_tokens: data["usage"]["output_tokens"].as_u64(),
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &str { "anthropic" }
    fn model_name(&self) -> &str { &self.model }
}
