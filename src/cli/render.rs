use console::style;
use crate::models::*;
use crate::pipeline::state::{PipelineStatus, PipelineSummary};
use crate::utils::formatting::{format_duration, round2};

/// End-of-run summary for `generate`.
pub fn render_run_summary(summary: &PipelineSummary) -> String {
    let mut lines = Vec::new();
    let headline = match summary.status {
        PipelineStatus::Completed => format!("{} Reports generated", style("✓").green().bold()),
        PipelineStatus::Partial => format!("{} Reports partially generated", style("⚠").yellow().bold()),
        PipelineStatus::Failed => format!("{} No report written", style("✗").red().bold()),
    };
    lines.push(headline);
    lines.push(format!(
        "  Records: {} ({} columns) | Charts: {} | Narratives: {}/{}",
        summary.records, summary.columns, summary.charts, summary.narratives_filled, summary.narrative_slots
    ));
    lines.push(format!("  {}", render_kpi_line(&summary.kpis)));

    match (&summary.html_path, &summary.html_error) {
        (Some(path), _) => lines.push(format!("  {} {}", style("HTML").cyan(), path.display())),
        (None, Some(err)) => lines.push(format!("  {} {}", style("HTML").red(), style(err).red().dim())),
        (None, None) => {}
    }
    match (&summary.deck_path, &summary.deck_error) {
        (Some(path), _) => lines.push(format!("  {} {}", style("Deck").cyan(), path.display())),
        (None, Some(err)) => lines.push(format!("  {} {}", style("Deck").red(), style(err).red().dim())),
        (None, None) => {}
    }
    if !summary.logo_embedded {
        lines.push(format!("  {}", style("No logo embedded").dim()));
    }
    lines.push(format!("  Finished in {}", format_duration(summary.duration_ms)));
    lines.join("\n")
}

pub fn render_kpi_line(kpis: &KpiSummary) -> String {
    format!(
        "{} high ({:.1}%) | {} medium ({:.1}%) | {} low ({:.1}%) | {} total",
        style(kpis.high).red().bold(),
        kpis.percent(kpis.high),
        style(kpis.med).yellow().bold(),
        kpis.percent(kpis.med),
        style(kpis.low).green().bold(),
        kpis.percent(kpis.low),
        style(kpis.total).bold(),
    )
}

pub fn render_rollup(title: &str, groups: &[GroupRollup]) -> String {
    let mut lines = vec![style(title).cyan().bold().to_string()];
    if groups.is_empty() {
        lines.push(format!("  {}", style("(none)").dim()));
    }
    for g in groups {
        lines.push(format!(
            "  {:<32} sum {:>8}  mean {:>6}  n={}",
            g.group,
            round2(g.sum),
            round2(g.mean),
            g.count
        ));
    }
    lines.join("\n")
}

pub fn render_distribution(dist: &RiskDistribution) -> String {
    format!(
        "{}\n  Average risk {:.2} | Maximum risk {:.1} | {} locations | {} hazard types",
        style("Risk distribution").cyan().bold(),
        dist.avg_risk,
        dist.max_risk,
        dist.unique_locations,
        dist.unique_hazards,
    )
}
