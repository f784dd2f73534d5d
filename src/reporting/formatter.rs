use crate::models::*;
use crate::utils::formatting::round2;
use crate::utils::truncation::truncate_with_ellipsis;

pub const LOCATION_UNAVAILABLE: &str = "Location analysis data not available";
pub const HAZARD_UNAVAILABLE: &str = "Hazard type analysis data not available";
pub const FINDINGS_UNAVAILABLE: &str = "Risk findings data not available";

pub fn format_risk_distribution(dist: &RiskDistribution) -> String {
    let k = &dist.kpis;
    format!(
        "Risk Assessment Statistics:\n\n\
         • Total Findings: {}\n\
         • High Priority: {} ({:.1}%)\n\
         • Medium Priority: {} ({:.1}%)\n\
         • Low Priority: {} ({:.1}%)\n\n\
         • Average Risk Score: {:.2}\n\
         • Maximum Risk Score: {:.1}\n\
         • Locations Assessed: {}\n\
         • Hazard Types Identified: {}",
        k.total,
        k.high,
        dist.high_pct,
        k.med,
        dist.med_pct,
        k.low,
        dist.low_pct,
        dist.avg_risk,
        dist.max_risk,
        dist.unique_locations,
        dist.unique_hazards,
    )
}

/// Narrative followed by the highest-risk examples of that bucket.
pub fn format_priority_detail(narrative: &str, top: &[&Finding]) -> String {
    let mut text = narrative.to_string();
    if !top.is_empty() {
        text.push_str("\n\nTop Findings:\n");
        for (i, f) in top.iter().enumerate() {
            text.push_str(&format!(
                "{}. Risk Score: {:.1} - {}\n",
                i + 1,
                f.risk_score,
                truncate_with_ellipsis(&f.observation, 100)
            ));
        }
    }
    text
}

/// `count_label` is "Findings" for locations and "Count" for hazard types.
pub fn format_rollup(heading: &str, groups: &[GroupRollup], count_label: &str, unavailable: &str) -> String {
    if groups.is_empty() {
        return unavailable.to_string();
    }
    let mut text = format!("{}\n\n", heading);
    for g in groups {
        text.push_str(&format!(
            "• {}: Total Risk: {}, Avg: {}, {}: {}\n",
            g.group,
            round2(g.sum),
            round2(g.mean),
            count_label,
            g.count
        ));
    }
    text
}

pub fn format_top_findings(top: &[&Finding]) -> String {
    if top.is_empty() {
        return FINDINGS_UNAVAILABLE.to_string();
    }
    let mut text = String::new();
    for (i, f) in top.iter().enumerate() {
        text.push_str(&format!("{}. Risk Score: {}\n", i + 1, f.risk_score));
        text.push_str(&format!(
            "   Location: {} | Hazard: {} | Priority: {}\n",
            f.location, f.hazard_type, f.priority
        ));
        text.push_str(&format!("   {}\n\n", truncate_with_ellipsis(&f.observation, 150)));
    }
    text
}

pub fn format_recommendations(kpis: &KpiSummary) -> String {
    format!(
        "Immediate Action Items:\n\n\
         • Address {} critical high-priority risks requiring immediate attention\n\
         • Develop action plans for {} medium-priority findings\n\
         • Schedule routine maintenance for {} low-priority items\n\n\
         Strategic Recommendations:\n\n\
         • Implement comprehensive risk monitoring system\n\
         • Establish regular safety audit schedules\n\
         • Enhance staff training on identified hazard types\n\
         • Review and update safety protocols based on findings\n\
         • Allocate resources for high-risk location improvements\n\n\
         Next Steps:\n\n\
         • Prioritize critical findings for immediate remediation\n\
         • Assign responsible teams for each risk category\n\
         • Set target completion dates for all action items\n\
         • Schedule follow-up assessments to measure progress\n\
         • Document lessons learned for future audits",
        kpis.high, kpis.med, kpis.low
    )
}
