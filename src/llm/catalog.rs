pub struct ProviderInfo {
    pub id: &'static str,
    /// Environment variable holding the API key. Empty when no key is needed.
    pub env_var: &'static str,
    pub default_model: &'static str,
    pub base_url: Option<&'static str>,
}

pub static PROVIDERS: &[ProviderInfo] = &[
    ProviderInfo {
        id: "gemini",
        env_var: "GEMINI_API_KEY",
        default_model: "gemini-1.5-pro",
        base_url: None,
    },
    ProviderInfo {
        id: "openai",
        env_var: "OPENAI_API_KEY",
        default_model: "gpt-4o",
        base_url: None,
    },
    ProviderInfo {
        id: "anthropic",
        env_var: "ANTHROPIC_API_KEY",
        default_model: "claude-3-5-haiku-20241022",
        base_url: None,
    },
    ProviderInfo {
        id: "local",
        env_var: "",
        default_model: "llama3.1:8b",
        base_url: Some("http://localhost:11434/v1"),
    },
];

pub const DEFAULT_PROVIDER: &str = "gemini";

pub fn get_provider(id: &str) -> Option<&'static ProviderInfo> {
    PROVIDERS.iter().find(|p| p.id == id)
}

pub fn get_default_model(provider_id: &str) -> Option<&'static str> {
    get_provider(provider_id).map(|p| p.default_model)
}

/// Whether the provider can run without an API key.
pub fn is_keyless(provider_id: &str) -> bool {
    get_provider(provider_id).map_or(false, |p| p.env_var.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_provider_in_catalog() {
        let info = get_provider(DEFAULT_PROVIDER).unwrap();
        assert_eq!(info.env_var, "GEMINI_API_KEY");
        assert_eq!(get_default_model(DEFAULT_PROVIDER), Some("gemini-1.5-pro"));
    }

    #[test]
    fn test_keyless() {
        assert!(is_keyless("local"));
        assert!(!is_keyless("openai"));
        assert!(!is_keyless("unknown"));
    }
}
