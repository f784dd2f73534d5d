use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Source column names, as they appear in the audit export.
pub const COL_SEQUENCE: &str = "Sr. No";
pub const COL_OBSERVATION: &str = "Observation";
pub const COL_RECOMMENDATION: &str = "Recommendation";
pub const COL_PRIORITY: &str = "Priority";
pub const COL_PRIORITY_SCORE: &str = "Priority_Score";
pub const COL_HAZARD_TYPE: &str = "Type of Hazard";
pub const COL_LOCATION: &str = "Location_Norm";
pub const COL_RISK_SCORE: &str = "Risk_Score";
pub const COL_ASSET_CATEGORY: &str = "Asset Category";

/// Recognized columns in display order.
pub const CANONICAL_COLUMNS: [&str; 9] = [
    COL_SEQUENCE,
    COL_OBSERVATION,
    COL_RECOMMENDATION,
    COL_PRIORITY,
    COL_PRIORITY_SCORE,
    COL_HAZARD_TYPE,
    COL_LOCATION,
    COL_RISK_SCORE,
    COL_ASSET_CATEGORY,
];

/// Priority bucket of a finding, ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriorityLevel {
    High,
    Medium,
    Low,
}

impl PriorityLevel {
    /// Case-insensitive match against HIGH / MEDIUM / LOW. Anything else is unrecognized.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_uppercase().as_str() {
            "HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl std::fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row selection by priority. `All` bypasses filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityFilter {
    All,
    Level(PriorityLevel),
}

impl PriorityFilter {
    /// Narrative slots, in request order.
    pub const SLOTS: [PriorityFilter; 4] = [
        PriorityFilter::Level(PriorityLevel::High),
        PriorityFilter::Level(PriorityLevel::Medium),
        PriorityFilter::Level(PriorityLevel::Low),
        PriorityFilter::All,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        PriorityLevel::from_label(value).map(Self::Level)
    }

    pub fn slot_name(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Level(level) => level.as_str(),
        }
    }

    pub fn matches(&self, finding: &Finding) -> bool {
        match self {
            Self::All => true,
            Self::Level(level) => finding.priority.to_uppercase() == level.as_str(),
        }
    }
}

/// One normalized row of the audit table. Every field always carries a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub sequence: i64,
    pub observation: String,
    pub recommendation: String,
    /// Raw label as it appeared in the source (may be empty or unrecognized).
    pub priority: String,
    pub priority_score: i64,
    pub hazard_type: String,
    pub location: String,
    pub risk_score: f64,
    pub asset_category: String,
    /// Columns outside the recognized set, stringified.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl Finding {
    pub fn priority_level(&self) -> Option<PriorityLevel> {
        PriorityLevel::from_label(&self.priority)
    }

    /// Display value for a column name, recognized or extra.
    pub fn column_value(&self, column: &str) -> String {
        match column {
            COL_SEQUENCE => self.sequence.to_string(),
            COL_OBSERVATION => self.observation.clone(),
            COL_RECOMMENDATION => self.recommendation.clone(),
            COL_PRIORITY => self.priority.clone(),
            COL_PRIORITY_SCORE => self.priority_score.to_string(),
            COL_HAZARD_TYPE => self.hazard_type.clone(),
            COL_LOCATION => self.location.clone(),
            COL_RISK_SCORE => self.risk_score.to_string(),
            COL_ASSET_CATEGORY => self.asset_category.clone(),
            other => self.extra.get(other).cloned().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_finding(sequence: i64, priority: &str, risk: f64, location: &str, hazard: &str) -> Finding {
    Finding {
        sequence,
        observation: format!("Observation {}", sequence),
        recommendation: format!("Recommendation {}", sequence),
        priority: priority.to_string(),
        priority_score: 0,
        hazard_type: hazard.to_string(),
        location: location.to_string(),
        risk_score: risk,
        asset_category: String::new(),
        extra: BTreeMap::new(),
    }
}
