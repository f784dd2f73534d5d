use chrono::Utc;
use tracing::info;
use crate::cli::commands::GenerateArgs;
use crate::cli::render::render_run_summary;
use crate::config::{parse_config, resolve_settings, ReportConfig};
use crate::errors::ReportError;
use crate::pipeline::orchestrator::ReportPipeline;
use crate::pipeline::state::PipelineStatus;

pub async fn handle_generate(args: GenerateArgs, quiet: bool) -> Result<(), ReportError> {
    let file = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration");
            parse_config(path).await?
        }
        None => ReportConfig::default(),
    };
    let today = Utc::now().format("%Y-%m-%d").to_string();
    let settings = resolve_settings(&args.overrides(quiet), &file, &today)?;

    let summary = ReportPipeline::new(settings)?.run().await?;
    if !quiet {
        println!("{}", render_run_summary(&summary));
    }

    if summary.status == PipelineStatus::Failed {
        return Err(ReportError::Rendering(
            summary.html_error.unwrap_or_else(|| "No report was written".into()),
        ));
    }
    Ok(())
}
