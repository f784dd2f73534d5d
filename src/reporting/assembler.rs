use std::path::{Path, PathBuf};
use tracing::{info, warn};
use crate::errors::ReportError;
use crate::utils::formatting::file_component;
use super::document::{build_dashboard, build_deck, ReportInputs};
use super::html::render_dashboard;
use super::pptx::render_deck;

pub const DEFAULT_HTML_FILE: &str = "report.html";

/// Where the two documents go.
#[derive(Debug, Clone)]
pub struct OutputTarget {
    pub directory: PathBuf,
    pub html_file: String,
}

impl Default for OutputTarget {
    fn default() -> Self {
        Self { directory: PathBuf::from("."), html_file: DEFAULT_HTML_FILE.to_string() }
    }
}

/// Result of writing both outputs. Each side fails independently.
#[derive(Debug, Default)]
pub struct AssemblyOutcome {
    pub html_path: Option<PathBuf>,
    pub deck_path: Option<PathBuf>,
    pub html_error: Option<String>,
    pub deck_error: Option<String>,
}

/// `<Company>_Audit_Report_<AuditDate>.pptx`
pub fn deck_file_name(company: &str, audit_date: &str) -> String {
    format!(
        "{}_Audit_Report_{}.pptx",
        file_component(company),
        file_component(audit_date)
    )
}

/// Write to a sibling temp file, then rename over the target.
pub async fn atomic_write(path: &Path, content: &[u8]) -> Result<(), ReportError> {
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, content).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

async fn write_html(inputs: &ReportInputs<'_>, path: &Path) -> Result<(), ReportError> {
    let html = render_dashboard(&build_dashboard(inputs));
    atomic_write(path, html.as_bytes()).await
}

async fn write_deck(inputs: &ReportInputs<'_>, path: &Path) -> Result<(), ReportError> {
    let bytes = render_deck(&build_deck(inputs), inputs.logo)?;
    atomic_write(path, &bytes).await
}

/// HTML first, then the deck. A failure on one side never undoes the other.
pub async fn write_reports(inputs: &ReportInputs<'_>, target: &OutputTarget) -> AssemblyOutcome {
    let mut outcome = AssemblyOutcome::default();

    if let Err(e) = tokio::fs::create_dir_all(&target.directory).await {
        let message = format!("Cannot create {}: {}", target.directory.display(), e);
        warn!(error = %message, "Output directory unavailable");
        outcome.html_error = Some(message.clone());
        outcome.deck_error = Some(message);
        return outcome;
    }

    let html_path = target.directory.join(&target.html_file);
    match write_html(inputs, &html_path).await {
        Ok(()) => {
            info!(path = %html_path.display(), "HTML dashboard written");
            outcome.html_path = Some(html_path);
        }
        Err(e) => {
            let e = ReportError::Rendering(format!("HTML dashboard: {}", e));
            warn!(error = %e, "HTML dashboard failed");
            outcome.html_error = Some(e.to_string());
        }
    }

    let deck_path = target.directory.join(deck_file_name(inputs.company, inputs.audit_date));
    match write_deck(inputs, &deck_path).await {
        Ok(()) => {
            info!(path = %deck_path.display(), "Slide deck written");
            outcome.deck_path = Some(deck_path);
        }
        Err(e) => {
            let e = ReportError::Rendering(format!("Slide deck: {}", e));
            warn!(error = %e, "Slide deck failed");
            outcome.deck_error = Some(e.to_string());
        }
    }

    outcome
}
