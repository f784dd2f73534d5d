use std::path::PathBuf;
use tracing::{debug, info};
use crate::errors::ReportError;
use crate::llm::catalog;
use crate::pipeline::state::{LlmSettings, RunSettings};
use crate::reporting::assembler::{OutputTarget, DEFAULT_HTML_FILE};
use super::credentials::resolve_credential;
use super::types::ReportConfig;

pub const DEFAULT_DATA_FILE: &str = "audit_data.json";

/// Values given on the command line. `None` falls through to the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub company: Option<String>,
    pub logo: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub audit_date: Option<String>,
    pub html_name: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub prompts: Option<PathBuf>,
    pub no_ai: bool,
    pub quiet: bool,
}

/// Merge CLI values, the config file and the environment, in that order.
pub fn resolve_settings(
    cli: &Overrides,
    file: &ReportConfig,
    today: &str,
) -> Result<RunSettings, ReportError> {
    let company = cli
        .company
        .clone()
        .or_else(|| file.company_name().map(str::to_string))
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ReportError::Config("Company name is required (--company or company.name)".into()))?;

    let html_file = cli
        .html_name
        .clone()
        .or_else(|| file.html_file().map(str::to_string))
        .unwrap_or_else(|| DEFAULT_HTML_FILE.to_string());

    let settings = RunSettings {
        company,
        audit_date: cli
            .audit_date
            .clone()
            .or_else(|| file.audit_date.clone())
            .unwrap_or_else(|| today.to_string()),
        data_file: cli
            .data
            .clone()
            .or_else(|| file.data_file().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
        output: OutputTarget {
            directory: cli
                .output
                .clone()
                .or_else(|| file.output_directory().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(".")),
            html_file,
        },
        logo: cli.logo.clone().or_else(|| file.logo().map(PathBuf::from)),
        prompts_dir: cli.prompts.clone().or_else(|| file.prompts_directory().map(PathBuf::from)),
        llm: resolve_llm(cli, file)?,
        quiet: cli.quiet,
    };
    Ok(settings)
}

fn resolve_llm(cli: &Overrides, file: &ReportConfig) -> Result<Option<LlmSettings>, ReportError> {
    let section = file.llm.clone().unwrap_or_default();
    if cli.no_ai || section.enabled == Some(false) {
        info!("Text generation disabled by configuration");
        return Ok(None);
    }

    let provider = cli
        .provider
        .clone()
        .or(section.provider)
        .unwrap_or_else(|| catalog::DEFAULT_PROVIDER.to_string());
    let info = catalog::get_provider(&provider)
        .ok_or_else(|| ReportError::Config(format!("Unknown LLM provider: {}", provider)))?;

    let api_key = cli
        .api_key
        .as_deref()
        .and_then(resolve_credential)
        .or_else(|| section.api_key.as_deref().and_then(resolve_credential))
        .or_else(|| {
            if info.env_var.is_empty() {
                return None;
            }
            std::env::var(info.env_var).ok().filter(|k| !k.trim().is_empty())
        });

    let api_key = match api_key {
        Some(key) => key,
        None if catalog::is_keyless(&provider) => String::new(),
        None => {
            info!(provider = %provider, env_var = info.env_var, "No API key found, text generation disabled");
            return Ok(None);
        }
    };
    debug!(provider = %provider, "Text generation enabled");

    Ok(Some(LlmSettings {
        provider,
        model: cli.model.clone().or(section.model),
        api_key,
        base_url: cli.base_url.clone().or(section.base_url),
    }))
}
