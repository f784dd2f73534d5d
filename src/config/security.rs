use crate::errors::ReportError;

/// Values that end up in the dashboard or in file paths.
const DANGEROUS_PATTERNS: &[&str] = &[
    "<script",
    "javascript:",
    "vbscript:",
    "data:text/html",
];

/// Only dangerous as the scheme of the whole value.
const DANGEROUS_SCHEMES: &[&str] = &["file:"];

pub fn validate_security_patterns(value: &serde_yaml::Value) -> Result<(), ReportError> {
    check_value(value, &[])
}

fn check_value(value: &serde_yaml::Value, path: &[String]) -> Result<(), ReportError> {
    match value {
        serde_yaml::Value::String(s) => {
            let lower = s.trim().to_lowercase();
            let found = DANGEROUS_PATTERNS
                .iter()
                .find(|p| lower.contains(*p))
                .or_else(|| DANGEROUS_SCHEMES.iter().find(|p| lower.starts_with(*p)));
            match found {
                Some(pattern) => {
                    let path_str = if path.is_empty() { "root".to_string() } else { path.join(".") };
                    Err(ReportError::Config(format!(
                        "Dangerous pattern '{}' found at config path: {}",
                        pattern, path_str
                    )))
                }
                None => Ok(()),
            }
        }
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let mut new_path = path.to_vec();
                new_path.push(k.as_str().unwrap_or("unknown").to_string());
                check_value(v, &new_path)?;
            }
            Ok(())
        }
        serde_yaml::Value::Sequence(seq) => {
            for (i, v) in seq.iter().enumerate() {
                let mut new_path = path.to_vec();
                new_path.push(format!("[{}]", i));
                check_value(v, &new_path)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
