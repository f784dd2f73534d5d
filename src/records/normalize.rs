use std::collections::BTreeMap;
use serde_json::{Map, Value};
use crate::models::*;
use super::loader::RecordTable;

/// Turn one raw row into a fully populated finding. `position` is 1-based.
pub fn normalize_record(row: &Map<String, Value>, position: usize) -> Finding {
    let extra: BTreeMap<String, String> = row
        .iter()
        .filter(|(key, _)| !CANONICAL_COLUMNS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), text_or_default(Some(value))))
        .collect();

    Finding {
        sequence: int_or_default(row.get(COL_SEQUENCE)).unwrap_or(position as i64),
        observation: text_or_default(row.get(COL_OBSERVATION)),
        recommendation: text_or_default(row.get(COL_RECOMMENDATION)),
        priority: text_or_default(row.get(COL_PRIORITY)),
        priority_score: int_or_default(row.get(COL_PRIORITY_SCORE)).unwrap_or(0),
        hazard_type: text_or_default(row.get(COL_HAZARD_TYPE)),
        location: text_or_default(row.get(COL_LOCATION)),
        risk_score: float_or_default(row.get(COL_RISK_SCORE)).unwrap_or(0.0),
        asset_category: text_or_default(row.get(COL_ASSET_CATEGORY)),
        extra,
    }
}

pub fn normalize_table(table: &RecordTable) -> Vec<Finding> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| normalize_record(row, idx + 1))
        .collect()
}

fn text_or_default(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

fn float_or_default(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

fn int_or_default(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| float_or_default(value).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| float_or_default(value).map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_empty_row_gets_defaults() {
        let finding = normalize_record(&Map::new(), 4);
        assert_eq!(finding.sequence, 4);
        assert_eq!(finding.observation, "");
        assert_eq!(finding.priority, "");
        assert_eq!(finding.priority_score, 0);
        assert_eq!(finding.risk_score, 0.0);
        assert!(finding.extra.is_empty());
    }

    #[test]
    fn test_non_numeric_risk_defaults() {
        let finding = normalize_record(&row(json!({"Risk_Score": "not_a_number"})), 1);
        assert_eq!(finding.risk_score, 0.0);
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let finding = normalize_record(
            &row(json!({"Risk_Score": " 7.25 ", "Priority_Score": "3", "Sr. No": "12"})),
            1,
        );
        assert_eq!(finding.risk_score, 7.25);
        assert_eq!(finding.priority_score, 3);
        assert_eq!(finding.sequence, 12);
    }

    #[test]
    fn test_integer_fields_truncate() {
        let finding = normalize_record(&row(json!({"Priority_Score": 2.9, "Sr. No": "5.0"})), 1);
        assert_eq!(finding.priority_score, 2);
        assert_eq!(finding.sequence, 5);
    }

    #[test]
    fn test_nulls_and_wrong_types() {
        let finding = normalize_record(
            &row(json!({
                "Observation": null,
                "Risk_Score": [1, 2],
                "Priority_Score": true,
                "Type of Hazard": 42,
                "Sr. No": "abc"
            })),
            9,
        );
        assert_eq!(finding.observation, "");
        assert_eq!(finding.risk_score, 0.0);
        assert_eq!(finding.priority_score, 0);
        assert_eq!(finding.hazard_type, "42");
        assert_eq!(finding.sequence, 9);
    }

    #[test]
    fn test_extra_columns_kept() {
        let finding = normalize_record(
            &row(json!({"Priority": "HIGH", "Auditor": "Team B", "Photo Ref": null})),
            1,
        );
        assert_eq!(finding.extra.get("Auditor").map(String::as_str), Some("Team B"));
        assert_eq!(finding.extra.get("Photo Ref").map(String::as_str), Some(""));
        assert!(!finding.extra.contains_key("Priority"));
    }

    #[test]
    fn test_normalize_table_positions() {
        let table = RecordTable::from_value(json!([
            {"Priority": "HIGH"},
            {"Priority": "low", "Sr. No": 40}
        ]))
        .unwrap();
        let findings = normalize_table(&table);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].sequence, 1);
        assert_eq!(findings[1].sequence, 40);
    }
}
