use std::path::Path;
use serde_json::{Map, Value};
use tracing::debug;
use crate::errors::ReportError;

/// Raw audit table: one row per source object, every row carrying every column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    /// Union of keys across all rows, first-seen order.
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

impl RecordTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Build a table from already-parsed JSON, back-filling missing keys with null.
    pub fn from_value(value: Value) -> Result<Self, ReportError> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(ReportError::DataSource(format!(
                    "Expected a JSON array of objects, found {}",
                    json_kind(&other)
                )))
            }
        };

        let mut columns: Vec<String> = Vec::new();
        let mut rows = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(map) => {
                    for key in map.keys() {
                        if !columns.iter().any(|c| c == key) {
                            columns.push(key.clone());
                        }
                    }
                    rows.push(map);
                }
                other => {
                    return Err(ReportError::DataSource(format!(
                        "Element {} is {}, expected an object",
                        idx,
                        json_kind(&other)
                    )))
                }
            }
        }

        for row in &mut rows {
            for column in &columns {
                if !row.contains_key(column) {
                    row.insert(column.clone(), Value::Null);
                }
            }
        }

        Ok(Self { columns, rows })
    }
}

/// Read a JSON array of flat objects from disk.
pub async fn load_records(path: &Path) -> Result<RecordTable, ReportError> {
    if !path.exists() {
        return Err(ReportError::DataSource(format!("Data file not found: {}", path.display())));
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ReportError::DataSource(format!("Cannot read {}: {}", path.display(), e)))?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| ReportError::DataSource(format!("Invalid JSON in {}: {}", path.display(), e)))?;

    let table = RecordTable::from_value(value)?;
    debug!(path = %path.display(), rows = table.len(), columns = table.columns.len(), "Loaded records");
    Ok(table)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_columns_union_first_seen() {
        let table = RecordTable::from_value(json!([
            {"Priority": "HIGH", "Risk_Score": 8.5},
            {"Location_Norm": "Plant B", "Priority": "low"}
        ]))
        .unwrap();
        assert_eq!(table.columns, vec!["Priority", "Risk_Score", "Location_Norm"]);
        assert_eq!(table.rows[0].get("Location_Norm"), Some(&Value::Null));
        assert_eq!(table.rows[1].get("Risk_Score"), Some(&Value::Null));
    }

    #[test]
    fn test_empty_array_is_valid() {
        let table = RecordTable::from_value(json!([])).unwrap();
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_non_array_rejected() {
        let err = RecordTable::from_value(json!({"Priority": "HIGH"})).unwrap_err();
        assert!(matches!(err, ReportError::DataSource(_)));
    }

    #[test]
    fn test_non_object_element_rejected() {
        let err = RecordTable::from_value(json!([{"Priority": "HIGH"}, 3])).unwrap_err();
        assert!(matches!(err, ReportError::DataSource(_)));
        assert!(err.to_string().contains("Element 1"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = load_records(Path::new("/nonexistent/audit_data.json")).await.unwrap_err();
        assert!(matches!(err, ReportError::DataSource(_)));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[{{\"Priority\": ").unwrap();
        let err = load_records(file.path()).await.unwrap_err();
        assert!(matches!(err, ReportError::DataSource(_)));
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"Sr. No": 1, "Observation": "Blocked exit"}}]"#).unwrap();
        let table = load_records(file.path()).await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.columns, vec!["Sr. No", "Observation"]);
    }
}
