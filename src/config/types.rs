use serde::{Deserialize, Serialize};

/// Optional YAML configuration file. Every section may be omitted.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct ReportConfig {
    pub company: Option<CompanyConfig>,
    pub input: Option<InputConfig>,
    pub output: Option<OutputConfig>,
    /// Free-form label, defaults to today's date.
    pub audit_date: Option<String>,
    pub llm: Option<LLMConfig>,
    pub prompts: Option<PromptsConfig>,
}

impl ReportConfig {
    pub fn company_name(&self) -> Option<&str> {
        self.company.as_ref()?.name.as_deref()
    }

    pub fn logo(&self) -> Option<&str> {
        self.company.as_ref()?.logo.as_deref()
    }

    pub fn data_file(&self) -> Option<&str> {
        self.input.as_ref()?.data_file.as_deref()
    }

    pub fn output_directory(&self) -> Option<&str> {
        self.output.as_ref()?.directory.as_deref()
    }

    pub fn html_file(&self) -> Option<&str> {
        self.output.as_ref()?.html_file.as_deref()
    }

    pub fn prompts_directory(&self) -> Option<&str> {
        self.prompts.as_ref()?.directory.as_deref()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct CompanyConfig {
    pub name: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct InputConfig {
    pub data_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct OutputConfig {
    pub directory: Option<String>,
    pub html_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct LLMConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    /// Literal key or `$VAR` reference.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct PromptsConfig {
    pub directory: Option<String>,
}
