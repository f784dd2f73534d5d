use serde::{Deserialize, Serialize};
use super::finding::PriorityLevel;

/// Counts of findings per priority bucket.
///
/// Findings with a missing or unrecognized priority count toward `total`
/// only, so `high + med + low <= total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub high: usize,
    pub med: usize,
    pub low: usize,
    pub total: usize,
}

impl KpiSummary {
    pub fn count(&self, level: PriorityLevel) -> usize {
        match level {
            PriorityLevel::High => self.high,
            PriorityLevel::Medium => self.med,
            PriorityLevel::Low => self.low,
        }
    }

    /// Share of `count` in the whole table, as a percentage. An empty table reports 0%.
    pub fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }

    pub fn unclassified(&self) -> usize {
        self.total - (self.high + self.med + self.low)
    }
}

/// Aggregate of one metric over one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRollup {
    pub group: String,
    pub sum: f64,
    pub mean: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Location,
    HazardType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    RiskScore,
    PriorityScore,
}

/// Table-wide risk statistics shown on the distribution slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub kpis: KpiSummary,
    pub high_pct: f64,
    pub med_pct: f64,
    pub low_pct: f64,
    pub avg_risk: f64,
    pub max_risk: f64,
    pub unique_locations: usize,
    pub unique_hazards: usize,
}
