use super::types::ReportError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// Fatal errors abort the run; everything else degrades the output.
    pub fatal: bool,
}

impl ReportError {
    /// Classify this error to decide whether the pipeline can carry on.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Nothing can be produced without a table or a usable configuration
            ReportError::DataSource(_) => ErrorClassification {
                error_type: "DataSourceError",
                fatal: true,
            },
            ReportError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                fatal: true,
            },

            // Text generation failures only cost narrative text
            ReportError::EnrichmentUnavailable(_) => ErrorClassification {
                error_type: "EnrichmentUnavailable",
                fatal: false,
            },
            ReportError::RateLimit(_) => ErrorClassification {
                error_type: "RateLimitError",
                fatal: false,
            },
            ReportError::Authentication(_) => ErrorClassification {
                error_type: "AuthenticationError",
                fatal: false,
            },
            ReportError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                fatal: false,
            },
            ReportError::LLMApi(_) => ErrorClassification {
                error_type: "LLMApiError",
                fatal: false,
            },
            ReportError::Prompt(_) => ErrorClassification {
                error_type: "PromptError",
                fatal: false,
            },

            ReportError::AssetMissing(_) => ErrorClassification {
                error_type: "AssetMissing",
                fatal: false,
            },

            // Output-specific; the other output is still produced
            ReportError::Rendering(_) => ErrorClassification {
                error_type: "RenderingError",
                fatal: false,
            },
            ReportError::Zip(_) => ErrorClassification {
                error_type: "RenderingError",
                fatal: false,
            },
            ReportError::Io(_) => ErrorClassification {
                error_type: "IoError",
                fatal: false,
            },
            ReportError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                fatal: false,
            },
        }
    }

    /// Process exit code used by the CLI when this error ends the run.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReportError::Config(_) => 2,
            ReportError::DataSource(_) => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_source_is_fatal() {
        let err = ReportError::DataSource("audit_data.json not found".into());
        let class = err.classify();
        assert!(class.fatal);
        assert_eq!(class.error_type, "DataSourceError");
    }

    #[test]
    fn test_enrichment_unavailable_not_fatal() {
        let err = ReportError::EnrichmentUnavailable("no credential".into());
        let class = err.classify();
        assert!(!class.fatal);
        assert_eq!(class.error_type, "EnrichmentUnavailable");
    }

    #[test]
    fn test_provider_errors_not_fatal() {
        assert!(!ReportError::RateLimit("quota".into()).classify().fatal);
        assert!(!ReportError::Network("connection refused".into()).classify().fatal);
        assert!(!ReportError::Authentication("bad key".into()).classify().fatal);
        assert!(!ReportError::LLMApi("malformed".into()).classify().fatal);
    }

    #[test]
    fn test_asset_missing_not_fatal() {
        let err = ReportError::AssetMissing("logo.png".into());
        assert!(!err.classify().fatal);
    }

    #[test]
    fn test_rendering_not_fatal() {
        let err = ReportError::Rendering("deck writer failed".into());
        let class = err.classify();
        assert!(!class.fatal);
        assert_eq!(class.error_type, "RenderingError");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ReportError::Config("x".into()).exit_code(), 2);
        assert_eq!(ReportError::DataSource("x".into()).exit_code(), 3);
        assert_eq!(ReportError::Rendering("x".into()).exit_code(), 1);
    }
}
