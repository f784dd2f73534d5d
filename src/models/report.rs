use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use super::finding::PriorityFilter;

/// Substituted wherever a narrative slot is empty.
pub const CONTENT_NOT_AVAILABLE: &str = "Content not available";

/// Chart names, in build order.
pub const CHART_NAMES: [&str; 6] = [
    "Hazard Risk Breakdown",
    "Location vs Hazard Analysis",
    "Risk Contribution by Hazard Type",
    "Hierarchical Risk Distribution",
    "Risk vs Priority Correlation",
    "Total Risk Assessment by Location",
];

/// One analytical view, rendered as an inline HTML fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartArtifact {
    pub name: String,
    pub html: String,
}

/// Generated prose for one run. `None` means the text service produced nothing.
#[derive(Debug, Clone, Default)]
pub struct NarrativeSet {
    pub executive_summary: Option<String>,
    pub priority: HashMap<PriorityFilter, Option<String>>,
    pub charts: HashMap<String, Option<String>>,
}

impl NarrativeSet {
    pub fn priority_text(&self, filter: PriorityFilter) -> Option<&str> {
        self.priority.get(&filter).and_then(|t| t.as_deref())
    }

    pub fn chart_text(&self, name: &str) -> Option<&str> {
        self.charts.get(name).and_then(|t| t.as_deref())
    }

    /// Number of slots that received text.
    pub fn filled(&self) -> usize {
        let exec = usize::from(self.executive_summary.is_some());
        let priority = self.priority.values().filter(|t| t.is_some()).count();
        let charts = self.charts.values().filter(|t| t.is_some()).count();
        exec + priority + charts
    }

    /// Number of slots that were requested.
    pub fn slots(&self) -> usize {
        1 + self.priority.len() + self.charts.len()
    }
}
