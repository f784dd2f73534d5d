use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;
use crate::errors::ReportError;
use super::provider::{check_status, LLMProvider};
use super::types::LLMResponse;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: &str, model: Option<&str>, base_url: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.unwrap_or("gemini-1.5-pro").to_string(),
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<LLMResponse, ReportError> {
        let body = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": {
                "maxOutputTokens": max_tokens,
            }
        });

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(model = %self.model, max_tokens, "Gemini request");

        let resp = self.client.post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ReportError::Network(format!("Gemini request failed: {}", e)))?;

        let status = resp.status();
        let text = resp.text().await
            .map_err(|e| ReportError::Network(format!("Gemini response read failed: {}", e)))?;
        check_status("Gemini", status, &text)?;

        let data: Value = serde_json::from_str(&text)
            .map_err(|e| ReportError::LLMApi(format!("Parse error: {}", e)))?;

        if let Some(error) = data.get("error") {
            return Err(ReportError::LLMApi(error["message"].as_str().unwrap_or("Unknown").to_string()));
        }

        let parts = data["candidates"][0]["content"]["parts"].as_array()
            .ok_or_else(|| ReportError::LLMApi("No candidates in Gemini response".into()))?;
        let content: String = parts.iter()
            .filter_map(|p| p["text"].as_str())
            .collect::<Vec<_>>()
            .join("");

        Ok(LLMResponse {
            content,
            input_tokens: data["usageMetadata"]["promptTokenCount"].as_u64(),
            output_tokens: data["usageMetadata"]["candidatesTokenCount"].as_u64(),
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &str { "gemini" }
    fn model_name(&self) -> &str { &self.model }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let provider = GeminiProvider::new("key", None, None);
        assert_eq!(provider.model_name(), "gemini-1.5-pro");
        assert_eq!(provider.provider_name(), "gemini");
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider = GeminiProvider::new("key", Some("gemini-2.0-flash"), Some("http://127.0.0.1:9000/"));
        assert_eq!(provider.base_url, "http://127.0.0.1:9000");
        assert_eq!(provider.model_name(), "gemini-2.0-flash");
    }
}
