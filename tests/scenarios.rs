use riskdeck::models::*;
use riskdeck::narrative::strip_markup;
use riskdeck::pipeline::metrics::{compute_kpis, filter_by_priority, rollup, top_by_risk};
use riskdeck::records::{load_records, normalize_table, RecordTable};
use serde_json::json;

fn findings(value: serde_json::Value) -> Vec<Finding> {
    normalize_table(&RecordTable::from_value(value).unwrap())
}

#[test]
fn test_two_row_scenario() {
    let rows = findings(json!([
        {"Priority":"HIGH","Risk_Score":8.5,"Location_Norm":"Plant A","Type of Hazard":"Fire"},
        {"Priority":"low","Risk_Score":1.2,"Location_Norm":"Plant B","Type of Hazard":"Slip"}
    ]));
    assert_eq!(compute_kpis(&rows), KpiSummary { high: 1, med: 0, low: 1, total: 2 });

    let by_location = rollup(&rows, GroupKey::Location, MetricKey::RiskScore);
    let flat: Vec<(&str, f64, f64, usize)> = by_location
        .iter()
        .map(|g| (g.group.as_str(), g.sum, g.mean, g.count))
        .collect();
    assert_eq!(flat, vec![("Plant A", 8.5, 8.5, 1), ("Plant B", 1.2, 1.2, 1)]);
}

#[test]
fn test_missing_priority_counts_only_in_total() {
    let rows = findings(json!([
        {"Priority":"HIGH","Risk_Score":2},
        {"Risk_Score":5}
    ]));
    let kpis = compute_kpis(&rows);
    assert_eq!(kpis.total, 2);
    assert_eq!(kpis.high + kpis.med + kpis.low, 1);
}

#[test]
fn test_priority_column_absent() {
    let rows = findings(json!([{"Risk_Score":1}, {"Risk_Score":2}, {}]));
    assert_eq!(compute_kpis(&rows), KpiSummary { high: 0, med: 0, low: 0, total: 3 });
}

#[test]
fn test_non_numeric_risk_is_zero() {
    let rows = findings(json!([{"Risk_Score":"not_a_number","Priority_Score":"x"}]));
    assert_eq!(rows[0].risk_score, 0.0);
    assert_eq!(rows[0].priority_score, 0);
    assert_eq!(rows[0].sequence, 1);
    assert_eq!(rows[0].observation, "");
}

#[test]
fn test_case_insensitive_filter() {
    let rows = findings(json!([
        {"Priority":"high"}, {"Priority":"High"}, {"Priority":"HIGH"}, {"Priority":"Highest"}
    ]));
    let selected = filter_by_priority(&rows, PriorityFilter::Level(PriorityLevel::High));
    assert_eq!(selected.len(), 3);
    assert_eq!(filter_by_priority(&rows, PriorityFilter::All).len(), 4);
}

#[test]
fn test_rollup_ties_keep_encounter_order() {
    let rows = findings(json!([
        {"Location_Norm":"East","Risk_Score":2},
        {"Location_Norm":"West","Risk_Score":4},
        {"Location_Norm":"North","Risk_Score":2},
        {"Location_Norm":"East","Risk_Score":2}
    ]));
    let groups: Vec<String> = rollup(&rows, GroupKey::Location, MetricKey::RiskScore)
        .into_iter()
        .map(|g| g.group)
        .collect();
    assert_eq!(groups, vec!["East", "West", "North"]);
}

#[test]
fn test_top_by_risk_is_stable() {
    let rows = findings(json!([
        {"Sr. No": 10, "Risk_Score": 5},
        {"Sr. No": 11, "Risk_Score": 9},
        {"Sr. No": 12, "Risk_Score": 5}
    ]));
    let order: Vec<i64> = top_by_risk(&rows, 3).iter().map(|f| f.sequence).collect();
    assert_eq!(order, vec![11, 10, 12]);
}

#[test]
fn test_strip_markup_idempotent() {
    for sample in [
        "<p>Hello&nbsp;<b>world</b></p>",
        "&lt;b&gt;escaped&lt;/b&gt;",
        "  spaced \n\n out  ",
        "a &amp;lt; b",
    ] {
        let once = strip_markup(sample);
        assert_eq!(strip_markup(&once), once, "not idempotent for {:?}", sample);
    }
}

#[test]
fn test_kpi_invariant_over_mixed_tables() {
    let labels = ["HIGH", "medium", "Low", "", "urgent", "MEDIUM "];
    for n in 0..labels.len() {
        let rows: Vec<serde_json::Value> = labels[..n].iter().map(|p| json!({"Priority": p})).collect();
        let kpis = compute_kpis(&findings(serde_json::Value::Array(rows)));
        assert_eq!(kpis.total, n);
        assert!(kpis.high + kpis.med + kpis.low <= kpis.total);
    }
}

#[tokio::test]
async fn test_loader_rejects_non_object_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"[{"Priority":"HIGH"}, 3]"#).unwrap();
    let err = load_records(&path).await.unwrap_err();
    assert!(matches!(err, riskdeck::errors::ReportError::DataSource(_)));
}
