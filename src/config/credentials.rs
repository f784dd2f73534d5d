use tracing::debug;

/// Resolve a credential value. A leading `$` names an environment variable.
/// An unset variable resolves to `None` so the caller can fall through to
/// the next source.
pub fn resolve_credential(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.strip_prefix('$') {
        Some(var_name) => match std::env::var(var_name) {
            Ok(resolved) if !resolved.is_empty() => {
                debug!(var = %var_name, "Resolved credential from environment");
                Some(resolved)
            }
            _ => {
                debug!(var = %var_name, "Environment variable not set");
                None
            }
        },
        None => Some(value.to_string()),
    }
}

/// Replace every occurrence of the secrets in `text`. Secrets shorter than
/// four characters are left alone.
pub fn redact_credentials(text: &str, secrets: &[&str]) -> String {
    let mut result = text.to_string();
    for secret in secrets {
        if secret.len() >= 4 {
            result = result.replace(secret, "[REDACTED]");
        }
    }
    result
}
