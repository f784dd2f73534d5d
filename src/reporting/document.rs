use chrono::{DateTime, Utc};
use crate::models::*;
use crate::narrative::{clean_narrative, insight_lines};
use crate::pipeline::metrics::{filter_by_priority, risk_distribution, rollup, top_by_risk};
use super::assets::LogoAsset;
use super::formatter::*;

pub const EXPORT_ROW_LIMIT: usize = 30;
pub const DECK_SLIDE_COUNT: usize = 10;
pub const REPORT_SUBTITLE: &str = "Comprehensive Risk Audit Report";

const EXPORT_COLUMNS: [&str; 7] = [
    COL_SEQUENCE,
    COL_PRIORITY,
    COL_RISK_SCORE,
    COL_LOCATION,
    COL_HAZARD_TYPE,
    COL_OBSERVATION,
    COL_RECOMMENDATION,
];

/// Everything both documents are built from.
pub struct ReportInputs<'a> {
    pub company: &'a str,
    pub audit_date: &'a str,
    pub findings: &'a [Finding],
    /// Non-canonical columns in first-seen order.
    pub extra_columns: &'a [String],
    pub kpis: KpiSummary,
    pub charts: &'a [ChartArtifact],
    pub narratives: &'a NarrativeSet,
    pub logo: Option<&'a LogoAsset>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Primary,
    Danger,
    Warning,
    Success,
}

impl Accent {
    pub fn hex(&self) -> &'static str {
        match self {
            Accent::Primary => "1E40AF",
            Accent::Danger => "DC2626",
            Accent::Warning => "EA580C",
            Accent::Success => "059669",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Accent::Primary => "total",
            Accent::Danger => "high",
            Accent::Warning => "medium",
            Accent::Success => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub label: &'static str,
    pub caption: &'static str,
    pub value: usize,
    pub percent: f64,
    pub accent: Accent,
    pub filter: PriorityFilter,
}

fn kpi_cards(kpis: &KpiSummary, captions: [&'static str; 4]) -> Vec<KpiCard> {
    let card = |label, caption, value, accent, filter| KpiCard {
        label,
        caption,
        value,
        percent: kpis.percent(value),
        accent,
        filter,
    };
    vec![
        card("Critical Risks", captions[0], kpis.high, Accent::Danger, PriorityFilter::Level(PriorityLevel::High)),
        card("Medium Risks", captions[1], kpis.med, Accent::Warning, PriorityFilter::Level(PriorityLevel::Medium)),
        card("Low Risks", captions[2], kpis.low, Accent::Success, PriorityFilter::Level(PriorityLevel::Low)),
        card("Total Findings", captions[3], kpis.total, Accent::Primary, PriorityFilter::All),
    ]
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel {
    pub anchor: String,
    pub name: String,
    pub html: String,
    /// Empty when no insight text was generated.
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriorityPanel {
    pub filter: PriorityFilter,
    pub title: &'static str,
    pub narrative: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// HIGH, MEDIUM or LOW for client-side filtering; empty when unrecognized.
    pub priority: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl TableView {
    fn build(findings: &[Finding], columns: Vec<String>) -> Self {
        let rows = findings
            .iter()
            .map(|f| TableRow {
                priority: f.priority_level().map(|l| l.as_str().to_string()).unwrap_or_default(),
                cells: columns.iter().map(|c| f.column_value(c)).collect(),
            })
            .collect();
        Self { columns, rows }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardDocument {
    pub company: String,
    pub audit_date: String,
    pub logo_data_uri: Option<String>,
    pub kpis: Vec<KpiCard>,
    pub executive_summary: Option<String>,
    pub charts: Vec<ChartPanel>,
    pub priority_panels: Vec<PriorityPanel>,
    pub records: TableView,
    pub export: TableView,
}

pub fn build_dashboard(inputs: &ReportInputs) -> DashboardDocument {
    let charts = inputs
        .charts
        .iter()
        .enumerate()
        .map(|(idx, chart)| ChartPanel {
            anchor: format!("panel-chart-{}", idx + 1),
            name: chart.name.clone(),
            html: chart.html.clone(),
            insights: inputs
                .narratives
                .chart_text(&chart.name)
                .map(insight_lines)
                .unwrap_or_default(),
        })
        .collect();

    let panel = |filter: PriorityFilter, title| PriorityPanel {
        filter,
        title,
        narrative: inputs.narratives.priority_text(filter).map(str::to_string),
    };
    let priority_panels = vec![
        panel(PriorityFilter::All, "All Findings"),
        panel(PriorityFilter::Level(PriorityLevel::High), "High Priority"),
        panel(PriorityFilter::Level(PriorityLevel::Medium), "Medium Priority"),
        panel(PriorityFilter::Level(PriorityLevel::Low), "Low Priority"),
    ];

    let columns: Vec<String> = CANONICAL_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(inputs.extra_columns.iter().cloned())
        .collect();
    let export_rows = &inputs.findings[..inputs.findings.len().min(EXPORT_ROW_LIMIT)];

    DashboardDocument {
        company: inputs.company.to_string(),
        audit_date: inputs.audit_date.to_string(),
        logo_data_uri: inputs.logo.map(LogoAsset::data_uri),
        kpis: kpi_cards(
            &inputs.kpis,
            ["Immediate Action Required", "Monitor & Plan", "Routine Maintenance", "Complete Assessment"],
        ),
        executive_summary: inputs.narratives.executive_summary.clone(),
        charts,
        priority_panels,
        records: TableView::build(inputs.findings, columns),
        export: TableView::build(export_rows, EXPORT_COLUMNS.iter().map(|c| c.to_string()).collect()),
    }
}

// ---------------------------------------------------------------------------
// Deck
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideKind {
    Title,
    ExecutiveSummary,
    KpiOverview,
    RiskDistribution,
    HighPriority,
    MediumPriority,
    LocationRollup,
    HazardRollup,
    TopFindings,
    Recommendations,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlideBody {
    Cover { subtitle: String, date_line: String },
    /// Newline-separated paragraphs.
    Text { text: String, font_pt: u32 },
    Kpis(Vec<KpiCard>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub kind: SlideKind,
    pub title: String,
    pub accent: Accent,
    pub body: SlideBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeckDocument {
    pub company: String,
    pub audit_date: String,
    pub generated_at: DateTime<Utc>,
    pub slides: Vec<Slide>,
}

fn text_slide(kind: SlideKind, title: &str, accent: Accent, text: String, font_pt: u32) -> Slide {
    Slide {
        kind,
        title: title.to_string(),
        accent,
        body: SlideBody::Text { text, font_pt },
    }
}

fn priority_slide(inputs: &ReportInputs, kind: SlideKind, level: PriorityLevel, title: &str, accent: Accent) -> Slide {
    let filter = PriorityFilter::Level(level);
    let narrative = clean_narrative(inputs.narratives.priority_text(filter));
    let top = top_by_risk(filter_by_priority(inputs.findings, filter), 3);
    text_slide(kind, title, accent, format_priority_detail(&narrative, &top), 14)
}

/// The fixed ten-slide sequence.
pub fn build_deck(inputs: &ReportInputs) -> DeckDocument {
    let findings = inputs.findings;
    let mut locations = rollup(findings, GroupKey::Location, MetricKey::RiskScore);
    locations.truncate(10);
    let mut hazards = rollup(findings, GroupKey::HazardType, MetricKey::RiskScore);
    hazards.truncate(8);

    let slides = vec![
        Slide {
            kind: SlideKind::Title,
            title: inputs.company.to_string(),
            accent: Accent::Primary,
            body: SlideBody::Cover {
                subtitle: REPORT_SUBTITLE.to_string(),
                date_line: format!("Generated on {}", inputs.audit_date),
            },
        },
        text_slide(
            SlideKind::ExecutiveSummary,
            "Executive Summary",
            Accent::Primary,
            clean_narrative(inputs.narratives.executive_summary.as_deref()),
            16,
        ),
        Slide {
            kind: SlideKind::KpiOverview,
            title: "Key Performance Indicators".to_string(),
            accent: Accent::Primary,
            body: SlideBody::Kpis(kpi_cards(
                &inputs.kpis,
                ["Immediate Action", "Monitor & Plan", "Routine Maintenance", "Complete Assessment"],
            )),
        },
        text_slide(
            SlideKind::RiskDistribution,
            "Risk Distribution Overview",
            Accent::Primary,
            format_risk_distribution(&risk_distribution(findings)),
            16,
        ),
        priority_slide(inputs, SlideKind::HighPriority, PriorityLevel::High, "HIGH PRIORITY RISKS", Accent::Danger),
        priority_slide(inputs, SlideKind::MediumPriority, PriorityLevel::Medium, "MEDIUM PRIORITY RISKS", Accent::Warning),
        text_slide(
            SlideKind::LocationRollup,
            "Location Risk Analysis",
            Accent::Primary,
            format_rollup("Risk Assessment by Location:", &locations, "Findings", LOCATION_UNAVAILABLE),
            14,
        ),
        text_slide(
            SlideKind::HazardRollup,
            "Hazard Type Analysis",
            Accent::Primary,
            format_rollup("Risk Assessment by Hazard Type:", &hazards, "Count", HAZARD_UNAVAILABLE),
            14,
        ),
        text_slide(
            SlideKind::TopFindings,
            "Top Risk Findings",
            Accent::Primary,
            format_top_findings(&top_by_risk(findings, 5)),
            12,
        ),
        text_slide(
            SlideKind::Recommendations,
            "Recommendations & Next Steps",
            Accent::Primary,
            format_recommendations(&inputs.kpis),
            14,
        ),
    ];
    debug_assert_eq!(slides.len(), DECK_SLIDE_COUNT);

    DeckDocument {
        company: inputs.company.to_string(),
        audit_date: inputs.audit_date.to_string(),
        generated_at: inputs.generated_at,
        slides,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::finding::sample_finding;
    use crate::pipeline::metrics::compute_kpis;

    pub(crate) fn scenario_findings() -> Vec<Finding> {
        vec![
            sample_finding(1, "HIGH", 8.5, "Plant A", "Fire"),
            sample_finding(2, "low", 1.2, "Plant B", "Slip"),
        ]
    }

    pub(crate) fn inputs<'a>(findings: &'a [Finding], narratives: &'a NarrativeSet, charts: &'a [ChartArtifact]) -> ReportInputs<'a> {
        ReportInputs {
            company: "Acme Steel",
            audit_date: "2024-03-15",
            findings,
            extra_columns: &[],
            kpis: compute_kpis(findings),
            charts,
            narratives,
            logo: None,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_deck_has_ten_slides_in_order() {
        let findings = scenario_findings();
        let narratives = NarrativeSet::default();
        let deck = build_deck(&inputs(&findings, &narratives, &[]));
        let kinds: Vec<SlideKind> = deck.slides.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SlideKind::Title,
                SlideKind::ExecutiveSummary,
                SlideKind::KpiOverview,
                SlideKind::RiskDistribution,
                SlideKind::HighPriority,
                SlideKind::MediumPriority,
                SlideKind::LocationRollup,
                SlideKind::HazardRollup,
                SlideKind::TopFindings,
                SlideKind::Recommendations,
            ]
        );
        assert_eq!(deck.slides.len(), DECK_SLIDE_COUNT);
    }

    #[test]
    fn test_empty_narratives_use_placeholder() {
        let findings = scenario_findings();
        let narratives = NarrativeSet::default();
        let deck = build_deck(&inputs(&findings, &narratives, &[]));
        match &deck.slides[1].body {
            SlideBody::Text { text, .. } => assert_eq!(text, CONTENT_NOT_AVAILABLE),
            other => panic!("unexpected body {:?}", other),
        }
        match &deck.slides[4].body {
            SlideBody::Text { text, .. } => {
                assert!(text.starts_with(CONTENT_NOT_AVAILABLE));
                assert!(text.contains("1. Risk Score: 8.5 - Observation 1"));
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_priority_slide_narrative_is_stripped() {
        let findings = scenario_findings();
        let mut narratives = NarrativeSet::default();
        narratives.priority.insert(
            PriorityFilter::Level(PriorityLevel::Medium),
            Some("<p>Review&nbsp;<b>ladders</b></p>".into()),
        );
        let deck = build_deck(&inputs(&findings, &narratives, &[]));
        match &deck.slides[5].body {
            SlideBody::Text { text, .. } => assert_eq!(text, "Review ladders"),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_location_slide_sorted() {
        let findings = scenario_findings();
        let narratives = NarrativeSet::default();
        let deck = build_deck(&inputs(&findings, &narratives, &[]));
        match &deck.slides[6].body {
            SlideBody::Text { text, .. } => {
                let a = text.find("Plant A").unwrap();
                let b = text.find("Plant B").unwrap();
                assert!(a < b);
                assert!(text.contains("• Plant A: Total Risk: 8.5, Avg: 8.5, Findings: 1"));
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_empty_table_deck() {
        let narratives = NarrativeSet::default();
        let deck = build_deck(&inputs(&[], &narratives, &[]));
        assert_eq!(deck.slides.len(), DECK_SLIDE_COUNT);
        match &deck.slides[8].body {
            SlideBody::Text { text, .. } => assert_eq!(text, FINDINGS_UNAVAILABLE),
            other => panic!("unexpected body {:?}", other),
        }
        match &deck.slides[6].body {
            SlideBody::Text { text, .. } => assert_eq!(text, LOCATION_UNAVAILABLE),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_kpi_cards_percentages() {
        let findings = scenario_findings();
        let narratives = NarrativeSet::default();
        let dash = build_dashboard(&inputs(&findings, &narratives, &[]));
        assert_eq!(dash.kpis.len(), 4);
        assert_eq!(dash.kpis[0].value, 1);
        assert_eq!(dash.kpis[0].percent, 50.0);
        assert_eq!(dash.kpis[3].value, 2);
        assert_eq!(dash.kpis[3].percent, 100.0);
    }

    #[test]
    fn test_dashboard_records_not_truncated_export_capped() {
        let findings: Vec<Finding> = (1..=45).map(|i| sample_finding(i, "LOW", 1.0, "A", "Slip")).collect();
        let narratives = NarrativeSet::default();
        let dash = build_dashboard(&inputs(&findings, &narratives, &[]));
        assert_eq!(dash.records.rows.len(), 45);
        assert_eq!(dash.export.rows.len(), EXPORT_ROW_LIMIT);
        assert_eq!(dash.export.rows[0].cells[0], "1");
    }

    #[test]
    fn test_dashboard_extra_columns_follow_canonical() {
        let mut findings = scenario_findings();
        findings[0].extra.insert("Auditor".into(), "R. Iyer".into());
        let narratives = NarrativeSet::default();
        let extra = vec!["Auditor".to_string()];
        let mut inp = inputs(&findings, &narratives, &[]);
        inp.extra_columns = &extra;
        let dash = build_dashboard(&inp);
        assert_eq!(dash.records.columns.len(), CANONICAL_COLUMNS.len() + 1);
        assert_eq!(dash.records.columns.last().map(String::as_str), Some("Auditor"));
        assert_eq!(dash.records.rows[0].cells.last().map(String::as_str), Some("R. Iyer"));
        assert_eq!(dash.records.rows[1].cells.last().map(String::as_str), Some(""));
        assert_eq!(dash.records.rows[1].priority, "LOW");
    }

    #[test]
    fn test_row_priority_agrees_with_kpis() {
        let findings = vec![
            sample_finding(1, "high ", 5.0, "Plant A", "Fire"),
            sample_finding(2, "Medium", 3.0, "Plant B", "Slip"),
            sample_finding(3, "urgent", 2.0, "Plant C", "Noise"),
        ];
        let narratives = NarrativeSet::default();
        let dash = build_dashboard(&inputs(&findings, &narratives, &[]));
        let kpis = compute_kpis(&findings);
        assert_eq!(kpis.high, 0);
        let keys: Vec<&str> = dash.records.rows.iter().map(|r| r.priority.as_str()).collect();
        assert_eq!(keys, vec!["", "MEDIUM", ""]);
        assert_eq!(keys.iter().filter(|k| **k == "HIGH").count(), kpis.high);
    }

    #[test]
    fn test_chart_panels_carry_insights() {
        let findings = scenario_findings();
        let charts = vec![ChartArtifact { name: CHART_NAMES[0].into(), html: "<div></div>".into() }];
        let mut narratives = NarrativeSet::default();
        narratives.charts.insert(CHART_NAMES[0].into(), Some("• Fire leads\n- Slip trails".into()));
        let dash = build_dashboard(&inputs(&findings, &narratives, &charts));
        assert_eq!(dash.charts[0].insights, vec!["Fire leads", "Slip trails"]);
        assert_eq!(dash.priority_panels.len(), 4);
        assert_eq!(dash.priority_panels[0].filter, PriorityFilter::All);
    }
}
