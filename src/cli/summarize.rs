use serde::Serialize;
use crate::cli::commands::SummarizeArgs;
use crate::cli::render::{render_distribution, render_kpi_line, render_rollup};
use crate::errors::ReportError;
use crate::models::*;
use crate::pipeline::metrics::{compute_kpis, filter_by_priority, risk_distribution, rollup};
use crate::records::{load_records, normalize_table};

#[derive(Debug, Serialize)]
pub struct TableSummary {
    pub priority: &'static str,
    pub records: usize,
    pub columns: Vec<String>,
    pub kpis: KpiSummary,
    pub distribution: RiskDistribution,
    pub locations: Vec<GroupRollup>,
    pub hazards: Vec<GroupRollup>,
}

/// Aggregates only. Never touches the network.
pub fn summarize_findings(columns: Vec<String>, findings: &[Finding], filter: PriorityFilter, top: usize) -> TableSummary {
    let selected: Vec<Finding> = filter_by_priority(findings, filter).into_iter().cloned().collect();
    let findings = selected.as_slice();
    let mut locations = rollup(findings, GroupKey::Location, MetricKey::RiskScore);
    locations.truncate(top);
    let mut hazards = rollup(findings, GroupKey::HazardType, MetricKey::RiskScore);
    hazards.truncate(top);
    TableSummary {
        priority: filter.slot_name(),
        records: findings.len(),
        columns,
        kpis: compute_kpis(findings),
        distribution: risk_distribution(findings),
        locations,
        hazards,
    }
}

pub async fn handle_summarize(args: SummarizeArgs) -> Result<(), ReportError> {
    let table = load_records(&args.data).await?;
    let findings = normalize_table(&table);
    let summary = summarize_findings(table.columns.clone(), &findings, args.priority, args.top);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{} records ({}) from {}", summary.records, summary.priority, args.data.display());
        println!("{}", render_kpi_line(&summary.kpis));
        if summary.kpis.unclassified() > 0 {
            println!("{} without a recognized priority", summary.kpis.unclassified());
        }
        println!();
        println!("{}", render_distribution(&summary.distribution));
        println!();
        println!("{}", render_rollup("Total risk by location", &summary.locations));
        println!();
        println!("{}", render_rollup("Total risk by hazard type", &summary.hazards));
    }
    Ok(())
}
