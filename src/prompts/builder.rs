use crate::errors::ReportError;
use crate::models::*;
use crate::pipeline::metrics::filter_by_priority;
use crate::utils::truncation::truncate_chars;
use super::loader::*;

/// Example rows in the executive summary prompt.
pub const EXECUTIVE_EXAMPLES: usize = 8;
/// Rows included in dataset samples.
pub const SAMPLE_ROWS: usize = 20;
const OBSERVATION_PREVIEW: usize = 80;

const SAMPLE_COLUMNS: [&str; 9] = CANONICAL_COLUMNS;

/// Builds the three prompt kinds from aggregated data.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    loader: PromptLoader,
}

impl PromptBuilder {
    pub fn new(loader: PromptLoader) -> Self {
        Self { loader }
    }

    /// KPI counts plus up to eight example rows, in the order given.
    pub fn executive_summary_prompt(&self, kpis: &KpiSummary, top_examples: &[&Finding]) -> Result<String, ReportError> {
        let examples = top_examples
            .iter()
            .take(EXECUTIVE_EXAMPLES)
            .map(|f| {
                format!(
                    "- {} | {} | {} | {} | {}",
                    f.sequence,
                    f.risk_score,
                    f.location,
                    f.hazard_type,
                    truncate_chars(&f.observation, OBSERVATION_PREVIEW)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let vars = PromptVariables {
            total: Some(kpis.total),
            high: Some(kpis.high),
            medium: Some(kpis.med),
            low: Some(kpis.low),
            top_examples: Some(examples),
            ..Default::default()
        };
        let template = self.loader.load(EXECUTIVE_SUMMARY)?;
        Ok(self.loader.interpolate(&template, &vars))
    }

    pub fn priority_detail_prompt(&self, findings: &[Finding], filter: PriorityFilter) -> Result<String, ReportError> {
        let selected = filter_by_priority(findings, filter);
        let vars = PromptVariables {
            dataset: Some(dataset_sample(selected.into_iter())),
            ..Default::default()
        };
        let template = self.loader.load(PRIORITY_DETAIL)?;
        Ok(self.loader.interpolate(&template, &vars))
    }

    pub fn chart_insight_prompt(&self, chart_title: &str, findings: &[Finding]) -> Result<String, ReportError> {
        let vars = PromptVariables {
            chart_title: Some(chart_title.to_string()),
            dataset: Some(dataset_sample(findings.iter())),
            ..Default::default()
        };
        let template = self.loader.load(CHART_INSIGHT)?;
        Ok(self.loader.interpolate(&template, &vars))
    }
}

/// Pipe-delimited header plus the first twenty rows, in table order.
pub fn dataset_sample<'a>(findings: impl Iterator<Item = &'a Finding>) -> String {
    let mut lines = vec![SAMPLE_COLUMNS.join(" | ")];
    for finding in findings.take(SAMPLE_ROWS) {
        let cells: Vec<String> = SAMPLE_COLUMNS
            .iter()
            .map(|c| finding.column_value(c).replace(['\n', '\r', '|'], " "))
            .collect();
        lines.push(cells.join(" | "));
    }
    lines.join("\n")
}
