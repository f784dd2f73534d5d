use std::collections::HashSet;
use crate::models::*;

pub fn compute_kpis(findings: &[Finding]) -> KpiSummary {
    let mut kpis = KpiSummary {
        total: findings.len(),
        ..Default::default()
    };
    for finding in findings {
        match finding.priority_level() {
            Some(PriorityLevel::High) => kpis.high += 1,
            Some(PriorityLevel::Medium) => kpis.med += 1,
            Some(PriorityLevel::Low) => kpis.low += 1,
            None => {}
        }
    }
    kpis
}

/// Sum, mean and count of `metric` per group, largest sum first.
///
/// Ties keep the order in which groups were first encountered.
pub fn rollup(findings: &[Finding], group_key: GroupKey, metric: MetricKey) -> Vec<GroupRollup> {
    let mut groups: Vec<GroupRollup> = Vec::new();
    for finding in findings {
        let group = match group_key {
            GroupKey::Location => finding.location.as_str(),
            GroupKey::HazardType => finding.hazard_type.as_str(),
        };
        let value = match metric {
            MetricKey::RiskScore => finding.risk_score,
            MetricKey::PriorityScore => finding.priority_score as f64,
        };
        match groups.iter_mut().find(|g| g.group == group) {
            Some(existing) => {
                existing.sum += value;
                existing.count += 1;
            }
            None => groups.push(GroupRollup {
                group: group.to_string(),
                sum: value,
                mean: 0.0,
                count: 1,
            }),
        }
    }

    for g in &mut groups {
        g.mean = g.sum / g.count as f64;
    }
    // sort_by is stable
    groups.sort_by(|a, b| b.sum.total_cmp(&a.sum));
    groups
}

pub fn filter_by_priority(findings: &[Finding], filter: PriorityFilter) -> Vec<&Finding> {
    findings.iter().filter(|f| filter.matches(f)).collect()
}

/// The `n` highest-risk findings, ties in table order.
pub fn top_by_risk<'a, I>(findings: I, n: usize) -> Vec<&'a Finding>
where
    I: IntoIterator<Item = &'a Finding>,
{
    let mut ranked: Vec<&Finding> = findings.into_iter().collect();
    ranked.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
    ranked.truncate(n);
    ranked
}

pub fn risk_distribution(findings: &[Finding]) -> RiskDistribution {
    let kpis = compute_kpis(findings);
    if findings.is_empty() {
        return RiskDistribution { kpis, ..Default::default() };
    }

    let total_risk: f64 = findings.iter().map(|f| f.risk_score).sum();
    let max_risk = findings
        .iter()
        .map(|f| f.risk_score)
        .fold(f64::NEG_INFINITY, f64::max);
    let unique_locations: HashSet<&str> = findings.iter().map(|f| f.location.as_str()).collect();
    let unique_hazards: HashSet<&str> = findings.iter().map(|f| f.hazard_type.as_str()).collect();

    RiskDistribution {
        kpis,
        high_pct: kpis.percent(kpis.high),
        med_pct: kpis.percent(kpis.med),
        low_pct: kpis.percent(kpis.low),
        avg_risk: total_risk / findings.len() as f64,
        max_risk,
        unique_locations: unique_locations.len(),
        unique_hazards: unique_hazards.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::finding::sample_finding;

    fn scenario() -> Vec<Finding> {
        vec![
            sample_finding(1, "HIGH", 8.5, "Plant A", "Fire"),
            sample_finding(2, "low", 1.2, "Plant B", "Slip"),
        ]
    }

    #[test]
    fn test_compute_kpis_scenario() {
        let kpis = compute_kpis(&scenario());
        assert_eq!(kpis, KpiSummary { high: 1, med: 0, low: 1, total: 2 });
    }

    #[test]
    fn test_missing_priority_counts_in_total_only() {
        let findings = vec![
            sample_finding(1, "", 3.0, "A", "Fire"),
            sample_finding(2, "Critical", 3.0, "A", "Fire"),
            sample_finding(3, "medium", 3.0, "A", "Fire"),
        ];
        let kpis = compute_kpis(&findings);
        assert_eq!(kpis.total, 3);
        assert_eq!(kpis.high + kpis.med + kpis.low, 1);
    }

    #[test]
    fn test_compute_kpis_empty() {
        assert_eq!(compute_kpis(&[]), KpiSummary::default());
    }

    #[test]
    fn test_rollup_scenario() {
        let groups = rollup(&scenario(), GroupKey::Location, MetricKey::RiskScore);
        assert_eq!(
            groups,
            vec![
                GroupRollup { group: "Plant A".into(), sum: 8.5, mean: 8.5, count: 1 },
                GroupRollup { group: "Plant B".into(), sum: 1.2, mean: 1.2, count: 1 },
            ]
        );
    }

    #[test]
    fn test_rollup_stable_ties() {
        let findings = vec![
            sample_finding(1, "LOW", 2.0, "Warehouse", "Slip"),
            sample_finding(2, "LOW", 5.0, "Office", "Fire"),
            sample_finding(3, "LOW", 3.0, "Warehouse", "Slip"),
            sample_finding(4, "LOW", 5.0, "Yard", "Electrical"),
        ];
        let groups = rollup(&findings, GroupKey::Location, MetricKey::RiskScore);
        let names: Vec<&str> = groups.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(names, vec!["Warehouse", "Office", "Yard"]);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].mean, 2.5);
    }

    #[test]
    fn test_rollup_hazard_priority_score() {
        let mut findings = vec![
            sample_finding(1, "HIGH", 1.0, "A", "Fire"),
            sample_finding(2, "HIGH", 1.0, "A", "Noise"),
        ];
        findings[0].priority_score = 1;
        findings[1].priority_score = 3;
        let groups = rollup(&findings, GroupKey::HazardType, MetricKey::PriorityScore);
        assert_eq!(groups[0].group, "Noise");
        assert_eq!(groups[0].sum, 3.0);
    }

    #[test]
    fn test_filter_case_insensitive() {
        let findings = vec![
            sample_finding(1, "high", 1.0, "A", "Fire"),
            sample_finding(2, "High", 1.0, "A", "Fire"),
            sample_finding(3, "HIGH", 1.0, "A", "Fire"),
            sample_finding(4, "LOW", 1.0, "A", "Fire"),
        ];
        let selected = filter_by_priority(&findings, PriorityFilter::Level(PriorityLevel::High));
        assert_eq!(selected.len(), 3);
        assert_eq!(filter_by_priority(&findings, PriorityFilter::All).len(), 4);
    }

    #[test]
    fn test_top_by_risk_ties_keep_order() {
        let findings = vec![
            sample_finding(1, "LOW", 4.0, "A", "Fire"),
            sample_finding(2, "LOW", 9.0, "A", "Fire"),
            sample_finding(3, "LOW", 4.0, "A", "Fire"),
        ];
        let top: Vec<i64> = top_by_risk(&findings, 2).iter().map(|f| f.sequence).collect();
        assert_eq!(top, vec![2, 1]);
        assert_eq!(top_by_risk(&findings, 10).len(), 3);
    }

    #[test]
    fn test_risk_distribution() {
        let dist = risk_distribution(&scenario());
        assert_eq!(dist.high_pct, 50.0);
        assert_eq!(dist.med_pct, 0.0);
        assert_eq!(dist.max_risk, 8.5);
        assert!((dist.avg_risk - 4.85).abs() < 1e-9);
        assert_eq!(dist.unique_locations, 2);
        assert_eq!(dist.unique_hazards, 2);
    }

    #[test]
    fn test_risk_distribution_empty() {
        let dist = risk_distribution(&[]);
        assert_eq!(dist, RiskDistribution::default());
    }
}
