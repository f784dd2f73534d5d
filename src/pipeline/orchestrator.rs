use std::sync::Arc;
use std::time::Instant;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use crate::charts::build_chart_set;
use crate::errors::ReportError;
use crate::llm::{self, LLMProvider};
use crate::models::*;
use crate::narrative::NarrativeRequester;
use crate::prompts::{PromptBuilder, PromptLoader};
use crate::records::{load_records, normalize_table, RecordTable};
use crate::reporting::{load_logo, write_reports, ReportInputs};
use super::metrics::compute_kpis;
use super::state::*;

/// Linear batch run: load, normalize, aggregate, enrich, render.
pub struct ReportPipeline {
    settings: RunSettings,
    provider: Option<Arc<dyn LLMProvider>>,
}

impl ReportPipeline {
    pub fn new(settings: RunSettings) -> Result<Self, ReportError> {
        let provider = match &settings.llm {
            Some(llm) => Some(llm::create_provider(
                &llm.provider,
                &llm.api_key,
                llm.model.as_deref(),
                llm.base_url.as_deref(),
            )?),
            None => None,
        };
        Ok(Self { settings, provider })
    }

    /// Replace the text-generation provider, e.g. with a stub.
    pub fn with_provider(mut self, provider: Option<Arc<dyn LLMProvider>>) -> Self {
        self.provider = provider;
        self
    }

    pub async fn run(&self) -> Result<PipelineSummary, ReportError> {
        let start = Instant::now();
        let settings = &self.settings;
        info!(
            company = %settings.company,
            audit_date = %settings.audit_date,
            data = %settings.data_file.display(),
            "Starting report run"
        );

        let table = load_records(&settings.data_file).await?;
        let findings = normalize_table(&table);
        let extra_columns = extra_columns(&table);
        let kpis = compute_kpis(&findings);
        info!(
            total = kpis.total,
            high = kpis.high,
            medium = kpis.med,
            low = kpis.low,
            "KPIs computed"
        );

        let logo = load_logo(settings.logo.as_deref()).await;
        let charts = build_chart_set(&findings);

        let builder = PromptBuilder::new(PromptLoader::new(settings.prompts_dir.clone()));
        let mut requester = NarrativeRequester::new(self.provider.clone(), builder);
        if requester.is_enabled() && !settings.quiet {
            requester = requester.with_progress(progress_bar(NarrativeRequester::request_count(&charts)));
        }
        let narratives = requester.collect(&findings, &kpis, &charts).await;
        info!(filled = narratives.filled(), slots = narratives.slots(), "Narratives collected");

        let inputs = ReportInputs {
            company: &settings.company,
            audit_date: &settings.audit_date,
            findings: &findings,
            extra_columns: &extra_columns,
            kpis,
            charts: &charts,
            narratives: &narratives,
            logo: logo.as_ref(),
            generated_at: Utc::now(),
        };
        let outcome = write_reports(&inputs, &settings.output).await;

        let status = match (&outcome.html_path, &outcome.deck_path) {
            (Some(_), Some(_)) => PipelineStatus::Completed,
            (None, None) => PipelineStatus::Failed,
            _ => PipelineStatus::Partial,
        };
        if status != PipelineStatus::Completed {
            warn!(status = ?status, "Report run finished with errors");
        }

        Ok(PipelineSummary {
            status,
            records: findings.len(),
            columns: table.columns.len(),
            kpis,
            charts: charts.len(),
            narratives_filled: narratives.filled(),
            narrative_slots: narratives.slots(),
            logo_embedded: logo.is_some(),
            html_path: outcome.html_path,
            deck_path: outcome.deck_path,
            html_error: outcome.html_error,
            deck_error: outcome.deck_error,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Input columns outside the canonical set, first-seen order.
pub fn extra_columns(table: &RecordTable) -> Vec<String> {
    table
        .columns
        .iter()
        .filter(|c| !CANONICAL_COLUMNS.contains(&c.as_str()))
        .cloned()
        .collect()
}

fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("  {bar:30.cyan/dark_gray} {pos}/{len} narratives | {msg}") {
        bar.set_style(style.progress_chars("█▓░"));
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extra_columns_skip_canonical() {
        let table = RecordTable::from_value(json!([
            {"Priority": "HIGH", "Auditor": "R", "Risk_Score": 1},
            {"Zone": "North", "Auditor": "S"}
        ]))
        .unwrap();
        assert_eq!(extra_columns(&table), vec!["Auditor".to_string(), "Zone".to_string()]);
    }
}
