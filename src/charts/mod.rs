use plotly::common::Mode;
use plotly::layout::BarMode;
use plotly::{Bar, HeatMap, Layout, Plot, Scatter};
use tracing::debug;
use crate::models::*;
use crate::pipeline::metrics::rollup;

const UNSPECIFIED: &str = "Unspecified";
const CHART_HEIGHT: usize = 440;

/// The six analytical views, in a fixed order.
pub fn build_chart_set(findings: &[Finding]) -> Vec<ChartArtifact> {
    let plots = [
        hazard_risk_breakdown(findings),
        location_hazard_heatmap(findings),
        risk_by_hazard(findings),
        hierarchical_distribution(findings),
        risk_priority_correlation(findings),
        risk_by_location(findings),
    ];

    CHART_NAMES
        .iter()
        .zip(plots)
        .enumerate()
        .map(|(idx, (name, plot))| {
            debug!(chart = name, "Chart built");
            ChartArtifact {
                name: name.to_string(),
                html: plot.to_inline_html(Some(&format!("chart-{}", idx + 1))),
            }
        })
        .collect()
}

fn label(value: &str) -> String {
    if value.trim().is_empty() {
        UNSPECIFIED.to_string()
    } else {
        value.to_string()
    }
}

/// Distinct values in first-seen order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for v in values {
        let v = label(v);
        if !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen
}

fn base_layout(stacked: bool) -> Layout {
    let layout = Layout::new().height(CHART_HEIGHT);
    if stacked {
        layout.bar_mode(BarMode::Stack)
    } else {
        layout
    }
}

/// Summed risk for every (category, priority label) pair, one trace per label.
fn stacked_by_priority(findings: &[Finding], categories: &[String], category_of: fn(&Finding) -> &str) -> Plot {
    let mut plot = Plot::new();
    for priority in distinct(findings.iter().map(|f| f.priority.as_str())) {
        let sums: Vec<f64> = categories
            .iter()
            .map(|c| {
                findings
                    .iter()
                    .filter(|f| label(category_of(f)) == *c && label(&f.priority) == priority)
                    .map(|f| f.risk_score)
                    .sum()
            })
            .collect();
        plot.add_trace(Bar::new(categories.to_vec(), sums).name(&priority));
    }
    plot.set_layout(base_layout(true));
    plot
}

fn hazard_risk_breakdown(findings: &[Finding]) -> Plot {
    let hazards = distinct(findings.iter().map(|f| f.hazard_type.as_str()));
    stacked_by_priority(findings, &hazards, |f| f.hazard_type.as_str())
}

fn location_hazard_heatmap(findings: &[Finding]) -> Plot {
    let locations = distinct(findings.iter().map(|f| f.location.as_str()));
    let hazards = distinct(findings.iter().map(|f| f.hazard_type.as_str()));
    let z: Vec<Vec<f64>> = hazards
        .iter()
        .map(|h| {
            locations
                .iter()
                .map(|l| {
                    findings
                        .iter()
                        .filter(|f| label(&f.hazard_type) == *h && label(&f.location) == *l)
                        .map(|f| f.risk_score)
                        .sum()
                })
                .collect()
        })
        .collect();

    let mut plot = Plot::new();
    plot.add_trace(HeatMap::new(locations, hazards, z).name("Total risk"));
    plot.set_layout(base_layout(false));
    plot
}

fn rollup_bar(findings: &[Finding], key: GroupKey, name: &str) -> Plot {
    let groups = rollup(findings, key, MetricKey::RiskScore);
    let x: Vec<String> = groups.iter().map(|g| label(&g.group)).collect();
    let y: Vec<f64> = groups.iter().map(|g| g.sum).collect();
    let mut plot = Plot::new();
    plot.add_trace(Bar::new(x, y).name(name));
    plot.set_layout(base_layout(false));
    plot
}

fn risk_by_hazard(findings: &[Finding]) -> Plot {
    rollup_bar(findings, GroupKey::HazardType, "Total risk")
}

fn hierarchical_distribution(findings: &[Finding]) -> Plot {
    let locations: Vec<String> = rollup(findings, GroupKey::Location, MetricKey::RiskScore)
        .iter()
        .map(|g| label(&g.group))
        .collect();
    stacked_by_priority(findings, &locations, |f| f.location.as_str())
}

fn risk_priority_correlation(findings: &[Finding]) -> Plot {
    let mut plot = Plot::new();
    for hazard in distinct(findings.iter().map(|f| f.hazard_type.as_str())) {
        let rows: Vec<&Finding> = findings.iter().filter(|f| label(&f.hazard_type) == hazard).collect();
        let x: Vec<i64> = rows.iter().map(|f| f.priority_score).collect();
        let y: Vec<f64> = rows.iter().map(|f| f.risk_score).collect();
        let text: Vec<String> = rows.iter().map(|f| f.observation.clone()).collect();
        plot.add_trace(
            Scatter::new(x, y)
                .mode(Mode::Markers)
                .name(&hazard)
                .text_array(text),
        );
    }
    plot.set_layout(base_layout(false));
    plot
}

fn risk_by_location(findings: &[Finding]) -> Plot {
    rollup_bar(findings, GroupKey::Location, "Total risk")
}
