use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use regex::Regex;
use crate::errors::ReportError;
use tracing::debug;

pub const EXECUTIVE_SUMMARY: &str = "executive-summary";
pub const PRIORITY_DETAIL: &str = "priority-detail";
pub const CHART_INSIGHT: &str = "chart-insight";

const BUILTIN_PROMPTS: &[(&str, &str)] = &[
    (EXECUTIVE_SUMMARY, include_str!("../../prompts/executive-summary.txt")),
    (PRIORITY_DETAIL, include_str!("../../prompts/priority-detail.txt")),
    (CHART_INSIGHT, include_str!("../../prompts/chart-insight.txt")),
];

const MAX_INCLUDE_DEPTH: u8 = 5;

static INCLUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@include\(([^)]+)\)").expect("include pattern"));

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Z_]+)\}\}").expect("placeholder pattern"));

/// Variables available for template interpolation in prompt files.
#[derive(Debug, Clone, Default)]
pub struct PromptVariables {
    pub total: Option<usize>,
    pub high: Option<usize>,
    pub medium: Option<usize>,
    pub low: Option<usize>,
    pub top_examples: Option<String>,
    pub dataset: Option<String>,
    pub chart_title: Option<String>,
}

/// Loads prompt templates, preferring files in an override directory over the built-ins.
#[derive(Debug, Clone, Default)]
pub struct PromptLoader {
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    pub fn new(override_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = &override_dir {
            debug!(dir = %dir.display(), "Prompt overrides enabled");
        }
        Self { override_dir }
    }

    /// Load a template by name (without .txt extension). Override files may use @include(path).
    pub fn load(&self, prompt_name: &str) -> Result<String, ReportError> {
        if let Some(dir) = &self.override_dir {
            let file_path = dir.join(format!("{}.txt", prompt_name));
            if file_path.exists() {
                let content = std::fs::read_to_string(&file_path).map_err(|e| {
                    ReportError::Prompt(format!("Failed to read prompt {}: {}", file_path.display(), e))
                })?;
                debug!(prompt = prompt_name, path = %file_path.display(), "Using prompt override");
                let processed = self.process_includes(dir, &content, 0)?;
                return Ok(processed.trim_end().to_string());
            }
        }

        BUILTIN_PROMPTS
            .iter()
            .find(|(name, _)| *name == prompt_name)
            .map(|(_, body)| body.trim_end().to_string())
            .ok_or_else(|| ReportError::Prompt(format!("Unknown prompt: {}", prompt_name)))
    }

    /// Replace {{VARIABLE}} placeholders in one pass over the template, so
    /// substituted values are never rescanned. None values become empty string;
    /// unknown names are left untouched.
    pub fn interpolate(&self, template: &str, vars: &PromptVariables) -> String {
        PLACEHOLDER_RE
            .replace_all(template, |caps: &regex::Captures| {
                let count = |v: Option<usize>| v.map(|n| n.to_string()).unwrap_or_default();
                let text = |v: &Option<String>| v.clone().unwrap_or_default();
                match &caps[1] {
                    "TOTAL" => count(vars.total),
                    "HIGH" => count(vars.high),
                    "MEDIUM" => count(vars.medium),
                    "LOW" => count(vars.low),
                    "TOP_EXAMPLES" => text(&vars.top_examples),
                    "DATASET" => text(&vars.dataset),
                    "CHART_TITLE" => text(&vars.chart_title),
                    _ => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    fn process_includes(&self, dir: &Path, content: &str, depth: u8) -> Result<String, ReportError> {
        if depth >= MAX_INCLUDE_DEPTH {
            return Err(ReportError::Prompt(format!(
                "Include depth limit ({}) exceeded, possible circular include",
                MAX_INCLUDE_DEPTH
            )));
        }

        let matches: Vec<(String, String)> = INCLUDE_RE
            .captures_iter(content)
            .map(|cap| (cap[0].to_string(), cap[1].to_string()))
            .collect();

        let mut result = content.to_string();
        for (full_match, include_path) in matches {
            let file_path = dir.join(&include_path);
            let included = std::fs::read_to_string(&file_path).map_err(|e| {
                ReportError::Prompt(format!(
                    "Included file {} (referenced as @include({})) unreadable: {}",
                    file_path.display(),
                    include_path,
                    e
                ))
            })?;
            let processed = self.process_includes(dir, &included, depth + 1)?;
            result = result.replace(&full_match, processed.trim_end());
        }
        Ok(result)
    }
}
