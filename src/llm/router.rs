use std::sync::Arc;
use crate::errors::ReportError;
use super::provider::LLMProvider;
use super::anthropic::AnthropicProvider;
use super::openai::OpenAIProvider;
use super::gemini::GeminiProvider;
use super::catalog;

pub fn create_provider(
    provider_name: &str,
    api_key: &str,
    model: Option<&str>,
    base_url: Option<&str>,
) -> Result<Arc<dyn LLMProvider>, ReportError> {
    let info = catalog::get_provider(provider_name)
        .ok_or_else(|| ReportError::Config(format!("Unknown LLM provider: {}", provider_name)))?;
    let model = model.or(Some(info.default_model));

    match info.id {
        "gemini" => Ok(Arc::new(GeminiProvider::new(api_key, model, base_url))),
        "anthropic" => Ok(Arc::new(AnthropicProvider::new(api_key, model, base_url))),
        "openai" => {
            let url = base_url.unwrap_or(super::openai::DEFAULT_BASE_URL);
            Ok(Arc::new(OpenAIProvider::with_base_url(api_key, model, url)))
        }
        "local" => {
            let url = base_url.or(info.base_url).unwrap_or(super::openai::DEFAULT_BASE_URL);
            Ok(Arc::new(OpenAIProvider::with_base_url(api_key, model, url).named("local")))
        }
        other => Err(ReportError::Config(format!("Unsupported LLM provider: {}", other))),
    }
}
