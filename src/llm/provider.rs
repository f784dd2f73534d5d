use async_trait::async_trait;
use reqwest::StatusCode;
use crate::errors::ReportError;
use crate::utils::truncation::truncate_error;
use super::types::LLMResponse;

/// A remote text-generation endpoint: one prompt in, one block of text out.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Free-form text completion within a token budget
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<LLMResponse, ReportError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;

    /// Model identifier
    fn model_name(&self) -> &str;
}

/// Map non-success HTTP statuses onto the error taxonomy.
pub(crate) fn check_status(provider: &str, status: StatusCode, body: &str) -> Result<(), ReportError> {
    if status.is_success() {
        return Ok(());
    }
    match status.as_u16() {
        429 => Err(ReportError::RateLimit(format!("{} rate limit exceeded", provider))),
        401 | 403 => Err(ReportError::Authentication(format!(
            "{} rejected the API key ({})",
            provider, status
        ))),
        _ => Err(ReportError::LLMApi(format!(
            "{} returned {}: {}",
            provider,
            status,
            truncate_error(body)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status_mapping() {
        assert!(check_status("gemini", StatusCode::OK, "").is_ok());
        assert!(matches!(
            check_status("gemini", StatusCode::TOO_MANY_REQUESTS, ""),
            Err(ReportError::RateLimit(_))
        ));
        assert!(matches!(
            check_status("openai", StatusCode::UNAUTHORIZED, ""),
            Err(ReportError::Authentication(_))
        ));
        assert!(matches!(
            check_status("anthropic", StatusCode::FORBIDDEN, ""),
            Err(ReportError::Authentication(_))
        ));
        assert!(matches!(
            check_status("gemini", StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            Err(ReportError::LLMApi(msg)) if msg.contains("boom")
        ));
    }
}
