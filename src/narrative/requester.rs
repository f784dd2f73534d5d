use std::sync::Arc;
use indicatif::ProgressBar;
use tracing::{debug, info, warn};
use crate::errors::ReportError;
use crate::llm::LLMProvider;
use crate::models::*;
use crate::pipeline::metrics::top_by_risk;
use crate::prompts::PromptBuilder;
use crate::prompts::builder::EXECUTIVE_EXAMPLES;

pub const CHART_TOKENS: u32 = 400;
pub const EXECUTIVE_TOKENS: u32 = 800;
pub const PRIORITY_TOKENS: u32 = 400;

/// Best-effort text enrichment. Every failure becomes an empty slot.
pub struct NarrativeRequester {
    provider: Option<Arc<dyn LLMProvider>>,
    builder: PromptBuilder,
    progress: Option<ProgressBar>,
}

impl NarrativeRequester {
    pub fn new(provider: Option<Arc<dyn LLMProvider>>, builder: PromptBuilder) -> Self {
        Self { provider, builder, progress: None }
    }

    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Number of requests `collect` makes for the given charts.
    pub fn request_count(charts: &[ChartArtifact]) -> usize {
        charts.len() + 1 + PriorityFilter::SLOTS.len()
    }

    /// One completion. Absent provider, provider error and blank output all yield `None`.
    pub async fn request_text(&self, prompt: &str, max_tokens: u32) -> Option<String> {
        let provider = self.provider.as_ref()?;
        match provider.complete(prompt, max_tokens).await {
            Ok(resp) if !resp.content.trim().is_empty() => {
                debug!(
                    provider = provider.provider_name(),
                    output_tokens = ?resp.output_tokens,
                    "Narrative received"
                );
                Some(resp.content)
            }
            Ok(_) => {
                warn!(provider = provider.provider_name(), "Empty narrative response");
                None
            }
            Err(e) => {
                let class = e.classify();
                warn!(
                    provider = provider.provider_name(),
                    error_type = class.error_type,
                    error = %e,
                    "Narrative request failed, using placeholder"
                );
                None
            }
        }
    }

    /// Chart insights, then the executive summary, then HIGH, MEDIUM, LOW and ALL.
    pub async fn collect(&self, findings: &[Finding], kpis: &KpiSummary, charts: &[ChartArtifact]) -> NarrativeSet {
        let mut set = NarrativeSet::default();
        if !self.is_enabled() {
            let reason = ReportError::EnrichmentUnavailable("no text-generation provider configured".into());
            info!(reason = %reason, "Narrative slots left empty");
        }

        for chart in charts {
            let text = self
                .prompted(self.builder.chart_insight_prompt(&chart.name, findings), CHART_TOKENS, &chart.name)
                .await;
            set.charts.insert(chart.name.clone(), text);
        }

        let top = top_by_risk(findings, EXECUTIVE_EXAMPLES);
        set.executive_summary = self
            .prompted(self.builder.executive_summary_prompt(kpis, &top), EXECUTIVE_TOKENS, "executive summary")
            .await;

        for slot in PriorityFilter::SLOTS {
            let text = self
                .prompted(self.builder.priority_detail_prompt(findings, slot), PRIORITY_TOKENS, slot.slot_name())
                .await;
            set.priority.insert(slot, text);
        }

        if let Some(bar) = &self.progress {
            bar.finish_and_clear();
        }
        set
    }

    async fn prompted(&self, prompt: Result<String, ReportError>, max_tokens: u32, slot: &str) -> Option<String> {
        if let Some(bar) = &self.progress {
            bar.set_message(slot.to_string());
        }
        let text = match prompt {
            Ok(p) => self.request_text(&p, max_tokens).await,
            Err(e) => {
                warn!(slot, error = %e, "Prompt construction failed");
                None
            }
        };
        if let Some(bar) = &self.progress {
            bar.inc(1);
        }
        text
    }
}
