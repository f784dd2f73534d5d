use maud::{html, Markup, PreEscaped, DOCTYPE};
use pulldown_cmark::{html as md_html, CowStr, Event, Options, Parser};
use crate::models::*;
use super::document::*;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

const STYLE: &str = r#"
:root {
  --primary-blue: #1E40AF;
  --danger-red: #DC2626;
  --warning-orange: #EA580C;
  --success-green: #059669;
  --text-dark: #1F2937;
  --muted: #6B7280;
}
body { font-family: 'Segoe UI', Arial, sans-serif; color: var(--text-dark); background: #F3F4F6; margin: 0; padding: 24px; }
.container { max-width: 1280px; margin: 0 auto; background: #fff; border-radius: 16px; padding: 40px; box-shadow: 0 10px 30px rgba(30, 64, 175, 0.08); }
.header { text-align: center; margin-bottom: 32px; }
.company-logo { max-height: 120px; width: auto; margin-bottom: 12px; }
.company-name { font-size: 2.6rem; color: var(--primary-blue); margin: 0; }
.audit-title { font-weight: 500; color: #374151; margin: 8px 0; }
.audit-date { color: var(--muted); }
.kpi-grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 20px; margin: 24px 0; }
.kpi-card { border-radius: 12px; padding: 20px; background: #F9FAFB; border-top: 5px solid var(--primary-blue); cursor: pointer; text-align: center; }
.kpi-card.high { border-color: var(--danger-red); }
.kpi-card.medium { border-color: var(--warning-orange); }
.kpi-card.low { border-color: var(--success-green); }
.kpi-label { font-weight: 600; color: #4B5563; }
.kpi-value { font-size: 2.4rem; font-weight: 700; margin: 6px 0; }
.kpi-card.high .kpi-value { color: var(--danger-red); }
.kpi-card.medium .kpi-value { color: var(--warning-orange); }
.kpi-card.low .kpi-value { color: var(--success-green); }
.kpi-card.total .kpi-value { color: var(--primary-blue); }
.kpi-subtitle, .kpi-percent { font-size: 0.85rem; color: var(--muted); }
.download-section { display: flex; justify-content: center; gap: 12px; margin: 16px 0 32px; }
.download-btn { background: var(--primary-blue); color: #fff; border: none; border-radius: 8px; padding: 12px 22px; font-size: 1rem; cursor: pointer; }
.section, .chart-container { margin: 32px 0; }
.section-title { color: var(--primary-blue); border-bottom: 2px solid #E5E7EB; padding-bottom: 8px; }
.chart-container { border: 1px solid #E5E7EB; border-radius: 12px; padding: 24px; }
.chart-title { margin-top: 0; }
.insights-list li { margin: 4px 0; }
.placeholder { color: var(--muted); font-style: italic; }
.priority-navigation { display: flex; gap: 8px; margin-bottom: 16px; }
.priority-btn { border: 1px solid var(--primary-blue); background: #fff; color: var(--primary-blue); border-radius: 20px; padding: 8px 18px; cursor: pointer; }
.priority-btn.active { background: var(--primary-blue); color: #fff; }
.priority-panel { display: none; }
.priority-panel.active { display: block; }
.data-table-container { overflow-x: auto; }
table { border-collapse: collapse; width: 100%; font-size: 0.9rem; }
th, td { border: 1px solid #E5E7EB; padding: 8px; text-align: left; vertical-align: top; }
th { background: #EFF6FF; color: var(--primary-blue); }
.status-badge { border-radius: 10px; padding: 2px 10px; font-weight: 600; font-size: 0.8rem; }
.status-high { background: #FEE2E2; color: var(--danger-red); }
.status-medium { background: #FFEDD5; color: var(--warning-orange); }
.status-low { background: #D1FAE5; color: var(--success-green); }
.print-only { display: none; }
.footer { margin-top: 40px; text-align: center; color: var(--muted); font-size: 0.8rem; }
@media (max-width: 768px) { .kpi-grid { grid-template-columns: 1fr 1fr; } }
@media print {
  body { background: #fff; padding: 0; }
  .container { box-shadow: none; padding: 0; }
  .download-section, .priority-navigation, .screen-only { display: none !important; }
  .priority-panel { display: block !important; }
  .print-only { display: block; }
  .chart-container { page-break-inside: avoid; }
}
"#;

const SCRIPT: &str = r#"
function showPriority(priority) {
  document.querySelectorAll('.priority-btn').forEach(function (btn) {
    btn.classList.toggle('active', btn.id === 'btn-' + priority);
  });
  document.querySelectorAll('.priority-panel').forEach(function (panel) {
    panel.classList.toggle('active', panel.dataset.priority === priority);
  });
  document.querySelectorAll('#auditTable tbody tr').forEach(function (row) {
    row.style.display = (priority === 'ALL' || row.dataset.priority === priority) ? '' : 'none';
  });
}
function printReport() {
  window.print();
}
"#;

/// Markdown narrative to HTML. Embedded raw HTML is escaped rather than passed through.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(CowStr::from(raw.into_string())),
        other => other,
    });
    let mut html_output = String::new();
    md_html::push_html(&mut html_output, parser);
    html_output
}

fn narrative_block(text: Option<&str>) -> Markup {
    html! {
        @match text {
            Some(t) => (PreEscaped(markdown_to_html(t))),
            None => p class="placeholder" { (CONTENT_NOT_AVAILABLE) },
        }
    }
}

fn kpi_grid(cards: &[KpiCard]) -> Markup {
    html! {
        div class="kpi-grid" {
            @for card in cards {
                div class=(format!("kpi-card {}", card.accent.css_class()))
                    onclick=(format!("showPriority('{}')", card.filter.slot_name())) {
                    div class="kpi-label" { (card.label) }
                    div class="kpi-value" { (card.value) }
                    div class="kpi-subtitle" { (card.caption) }
                    div class="kpi-percent" { (format!("{:.1}% of findings", card.percent)) }
                }
            }
        }
    }
}

fn chart_panel(panel: &ChartPanel) -> Markup {
    html! {
        div class="chart-container" id=(panel.anchor) {
            h3 class="chart-title" { (panel.name) }
            div class="chart-content" { (PreEscaped(&panel.html)) }
            h4 class="insights-title" { "Key Insights" }
            ul class="insights-list" {
                @if panel.insights.is_empty() {
                    li class="placeholder" { (CONTENT_NOT_AVAILABLE) }
                }
                @for line in &panel.insights {
                    li { (line) }
                }
            }
        }
    }
}

fn priority_section(panels: &[PriorityPanel]) -> Markup {
    html! {
        div class="section" {
            h2 class="section-title" { "Priority Analysis" }
            div class="priority-navigation" {
                @for panel in panels {
                    @let slot = panel.filter.slot_name();
                    button class=(if panel.filter == PriorityFilter::All { "priority-btn active" } else { "priority-btn" })
                        id=(format!("btn-{}", slot))
                        onclick=(format!("showPriority('{}')", slot)) { (panel.title) }
                }
            }
            @for panel in panels {
                div class=(if panel.filter == PriorityFilter::All { "priority-panel active" } else { "priority-panel" })
                    id=(format!("priority-{}", panel.filter.slot_name()))
                    data-priority=(panel.filter.slot_name()) {
                    h3 class="print-only" { (panel.title) }
                    (narrative_block(panel.narrative.as_deref()))
                }
            }
        }
    }
}

fn table(view: &TableView, id: Option<&str>) -> Markup {
    let priority_idx = view.columns.iter().position(|c| c == COL_PRIORITY);
    html! {
        table id=[id] {
            thead {
                tr {
                    @for col in &view.columns { th { (col) } }
                }
            }
            tbody {
                @for row in &view.rows {
                    tr data-priority=(row.priority) {
                        @for (idx, cell) in row.cells.iter().enumerate() {
                            td {
                                @if Some(idx) == priority_idx && !row.priority.is_empty() {
                                    span class=(format!("status-badge status-{}", row.priority.to_lowercase())) { (cell) }
                                } @else {
                                    (cell)
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Self-contained dashboard page. Plotly itself is loaded from its CDN.
pub fn render_dashboard(doc: &DashboardDocument) -> String {
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (doc.company) " - Risk Audit Report" }
                script src=(PLOTLY_CDN) {}
                style { (PreEscaped(STYLE)) }
            }
            body {
                div class="container" id="reportContainer" {
                    div class="header" {
                        @if let Some(logo) = &doc.logo_data_uri {
                            img class="company-logo" src=(logo) alt=(format!("{} Logo", doc.company));
                        }
                        h1 class="company-name" { (doc.company) }
                        h2 class="audit-title" { (REPORT_SUBTITLE) }
                        p class="audit-date" { "Generated on " (doc.audit_date) }
                    }

                    (kpi_grid(&doc.kpis))

                    div class="download-section" {
                        button class="download-btn" onclick="printReport()" { "Save as PDF / Print" }
                    }

                    div class="section" {
                        h2 class="section-title" { "Executive Summary" }
                        div class="exec-summary" { (narrative_block(doc.executive_summary.as_deref())) }
                    }

                    @for panel in &doc.charts {
                        (chart_panel(panel))
                    }

                    (priority_section(&doc.priority_panels))

                    div class="section screen-only" {
                        h2 class="section-title" { "Complete Audit Dataset" }
                        div class="data-table-container" {
                            (table(&doc.records, Some("auditTable")))
                        }
                    }

                    div class="section print-only" {
                        h2 class="section-title" {
                            "Detailed Findings (first " (doc.export.rows.len()) " of " (doc.records.rows.len()) ")"
                        }
                        (table(&doc.export, Some("exportTable")))
                    }

                    div class="footer" {
                        "Generated by riskdeck " (env!("CARGO_PKG_VERSION"))
                        " (" (env!("GIT_HASH")) ", built " (env!("BUILD_TIMESTAMP")) ")"
                    }
                }
                script { (PreEscaped(SCRIPT)) }
            }
        }
    };
    markup.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::finding::sample_finding;
    use crate::reporting::document::tests::{inputs, scenario_findings};

    #[test]
    fn test_markdown_escapes_raw_html() {
        let html = markdown_to_html("**Bold** <script>alert(1)</script>");
        assert!(html.contains("<strong>Bold</strong>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_placeholders_when_no_narrative() {
        let findings = scenario_findings();
        let narratives = NarrativeSet::default();
        let charts = vec![ChartArtifact { name: CHART_NAMES[0].into(), html: "<div id=\"c1\"></div>".into() }];
        let page = render_dashboard(&build_dashboard(&inputs(&findings, &narratives, &charts)));
        // executive summary + one chart + four priority panels
        assert_eq!(page.matches(CONTENT_NOT_AVAILABLE).count(), 6);
        assert!(page.contains("<div id=\"c1\"></div>"));
    }

    #[test]
    fn test_records_appear_in_dataset_and_export_tables() {
        let findings = scenario_findings();
        let narratives = NarrativeSet::default();
        let page = render_dashboard(&build_dashboard(&inputs(&findings, &narratives, &[])));
        assert_eq!(page.matches("Observation 1</td>").count(), 2); // dataset + export table
        assert!(page.contains("data-priority=\"LOW\""));
        assert!(page.contains("status-badge status-high"));
        assert!(page.contains("showPriority('MEDIUM')"));
    }

    #[test]
    fn test_status_badge_only_for_known_priorities() {
        let findings = vec![
            sample_finding(1, "Needs review", 2.0, "Plant A", "Fire"),
            sample_finding(2, "medium", 3.0, "Plant B", "Slip"),
        ];
        let narratives = NarrativeSet::default();
        let page = render_dashboard(&build_dashboard(&inputs(&findings, &narratives, &[])));
        assert!(page.contains("status-badge status-medium"));
        assert!(!page.contains("status-needs"));
        assert!(page.contains("<td>Needs review</td>"));
    }

    #[test]
    fn test_company_name_escaped() {
        let findings = scenario_findings();
        let narratives = NarrativeSet::default();
        let mut inp = inputs(&findings, &narratives, &[]);
        inp.company = "A&B <Works>";
        let page = render_dashboard(&build_dashboard(&inp));
        assert!(page.contains("A&amp;B &lt;Works&gt;"));
        assert!(!page.contains("<Works>"));
    }
}
