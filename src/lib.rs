pub mod charts;
pub mod cli;
pub mod config;
pub mod errors;
pub mod llm;
pub mod models;
pub mod narrative;
pub mod pipeline;
pub mod prompts;
pub mod records;
pub mod reporting;
pub mod utils;
