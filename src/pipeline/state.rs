use serde::Serialize;
use std::path::PathBuf;
use crate::models::KpiSummary;
use crate::reporting::assembler::OutputTarget;

/// Text-generation endpoint for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub provider: String,
    pub model: Option<String>,
    pub api_key: String,
    pub base_url: Option<String>,
}

/// Fully resolved configuration handed to the pipeline at startup.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub company: String,
    pub audit_date: String,
    pub data_file: PathBuf,
    pub output: OutputTarget,
    pub logo: Option<PathBuf>,
    pub prompts_dir: Option<PathBuf>,
    /// `None` disables text generation.
    pub llm: Option<LlmSettings>,
    pub quiet: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    /// Both documents written.
    Completed,
    /// At least one document failed.
    Partial,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub status: PipelineStatus,
    pub records: usize,
    pub columns: usize,
    pub kpis: KpiSummary,
    pub charts: usize,
    pub narratives_filled: usize,
    pub narrative_slots: usize,
    pub logo_embedded: bool,
    pub html_path: Option<PathBuf>,
    pub deck_path: Option<PathBuf>,
    pub html_error: Option<String>,
    pub deck_error: Option<String>,
    pub duration_ms: u64,
}

impl PipelineSummary {
    pub fn is_complete(&self) -> bool {
        self.status == PipelineStatus::Completed
    }
}
