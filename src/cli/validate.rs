use console::style;
use crate::cli::commands::ValidateArgs;
use crate::config::credentials::redact_credentials;
use crate::config::{parse_config, ReportConfig};
use crate::errors::ReportError;
use crate::llm::catalog;

/// One line per configured value. API keys are redacted.
pub fn describe_config(config: &ReportConfig) -> Vec<String> {
    let mut lines = Vec::new();
    let mut push = |key: &str, value: Option<&str>| {
        if let Some(v) = value {
            lines.push(format!("  {:<18} {}", key, v));
        }
    };
    push("company.name", config.company_name());
    push("company.logo", config.logo());
    push("input.data_file", config.data_file());
    push("output.directory", config.output_directory());
    push("output.html_file", config.html_file());
    push("audit_date", config.audit_date.as_deref());
    push("prompts.directory", config.prompts_directory());
    if let Some(llm) = &config.llm {
        let provider = llm.provider.as_deref().unwrap_or(catalog::DEFAULT_PROVIDER);
        push("llm.provider", Some(provider));
        push("llm.model", llm.model.as_deref().or_else(|| catalog::get_default_model(provider)));
        push("llm.base_url", llm.base_url.as_deref());
        if let Some(key) = llm.api_key.as_deref() {
            let shown = if key.starts_with('$') { key.to_string() } else { redact_credentials(key, &[key]) };
            push("llm.api_key", Some(&shown));
        }
        if let Some(enabled) = llm.enabled {
            push("llm.enabled", Some(if enabled { "true" } else { "false" }));
        }
    }
    lines
}

pub async fn handle_validate(args: ValidateArgs, quiet: bool) -> Result<(), ReportError> {
    let config = parse_config(&args.config).await?;
    println!(
        "{} Configuration is valid: {}",
        style("✓").green().bold(),
        args.config.display()
    );
    if !quiet {
        for line in describe_config(&config) {
            println!("{}", line);
        }
    }
    Ok(())
}
