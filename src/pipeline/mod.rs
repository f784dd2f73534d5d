pub mod metrics;
pub mod orchestrator;
pub mod state;

pub use orchestrator::ReportPipeline;
pub use state::{LlmSettings, PipelineStatus, PipelineSummary, RunSettings};
