use std::path::Path;
use crate::errors::ReportError;
use crate::llm::catalog;
use super::types::ReportConfig;
use super::security::validate_security_patterns;
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<ReportConfig, ReportError> {
    if !path.exists() {
        return Err(ReportError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(ReportError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

/// Security scan, advisory schema check, typed parse and semantic checks.
pub fn parse_config_str(content: &str) -> Result<ReportConfig, ReportError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| ReportError::Config(format!("Invalid YAML: {}", e)))?;
    if yaml.is_null() {
        return Ok(ReportConfig::default());
    }

    validate_security_patterns(&yaml)?;
    for msg in schema_warnings(&yaml)? {
        warn!(validation_error = %msg, "Config schema warning");
    }

    let config: ReportConfig = serde_yaml::from_value(yaml)
        .map_err(|e| ReportError::Config(format!("Invalid config: {}", e)))?;
    validate_semantics(&config)?;
    Ok(config)
}

/// Schema violations are reported, not enforced.
pub fn schema_warnings(yaml: &serde_yaml::Value) -> Result<Vec<String>, ReportError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| ReportError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| ReportError::Config(format!("Schema compilation error: {}", e)))?;

    let messages = match compiled.validate(&json_value) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.map(|e| format!("{} at {}", e, e.instance_path)).collect(),
    };
    Ok(messages)
}

fn validate_semantics(config: &ReportConfig) -> Result<(), ReportError> {
    if let Some(name) = config.company_name() {
        if name.trim().is_empty() {
            return Err(ReportError::Config("company.name must not be blank".into()));
        }
    }

    if let Some(html) = config.html_file() {
        if html.contains('/') || html.contains('\\') {
            return Err(ReportError::Config(format!(
                "output.html_file must be a file name, not a path: {}",
                html
            )));
        }
        if !(html.ends_with(".html") || html.ends_with(".htm")) {
            warn!(html_file = %html, "output.html_file has no .html extension");
        }
    }

    if let Some(date) = &config.audit_date {
        if date.trim().is_empty() {
            return Err(ReportError::Config("audit_date must not be blank".into()));
        }
    }

    if let Some(llm) = &config.llm {
        if let Some(provider) = &llm.provider {
            if catalog::get_provider(provider).is_none() {
                return Err(ReportError::Config(format!("Unknown LLM provider: {}", provider)));
            }
        }
        if llm.enabled == Some(false) && llm.api_key.is_some() {
            warn!("llm.api_key is set but text generation is disabled");
        }
    }

    Ok(())
}
