use std::path::PathBuf;
use clap::{Parser, Subcommand, Args};
use crate::config::Overrides;
use crate::models::PriorityFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

#[derive(Parser)]
#[command(
    name = "riskdeck",
    version,
    long_version = LONG_VERSION,
    about = "Turn audit findings into an HTML dashboard and a slide deck"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the HTML dashboard and the slide deck
    Generate(GenerateArgs),
    /// Print KPIs and rollups without rendering anything
    Summarize(SummarizeArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone, Debug, Default)]
pub struct GenerateArgs {
    /// JSON file holding an array of findings
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory for both documents
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Company name shown on both documents
    #[arg(long)]
    pub company: Option<String>,

    /// Logo image (PNG, JPEG or GIF)
    #[arg(long)]
    pub logo: Option<PathBuf>,

    /// Audit date label (defaults to today)
    #[arg(long)]
    pub audit_date: Option<String>,

    /// File name of the HTML dashboard
    #[arg(long)]
    pub html_name: Option<String>,

    /// LLM provider: gemini, openai, anthropic, local
    #[arg(long)]
    pub provider: Option<String>,

    /// LLM model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// LLM API key (or use env vars)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Custom endpoint for the provider
    #[arg(long)]
    pub base_url: Option<String>,

    /// Skip text generation entirely
    #[arg(long)]
    pub no_ai: bool,

    /// Directory of prompt templates overriding the built-in ones
    #[arg(long)]
    pub prompts: Option<PathBuf>,
}

impl GenerateArgs {
    pub fn overrides(&self, quiet: bool) -> Overrides {
        Overrides {
            company: self.company.clone(),
            logo: self.logo.clone(),
            data: self.data.clone(),
            output: self.output.clone(),
            audit_date: self.audit_date.clone(),
            html_name: self.html_name.clone(),
            provider: self.provider.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            prompts: self.prompts.clone(),
            no_ai: self.no_ai,
            quiet,
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct SummarizeArgs {
    /// JSON file holding an array of findings
    #[arg(short, long, default_value = crate::config::settings::DEFAULT_DATA_FILE)]
    pub data: PathBuf,

    /// Rows to show per rollup
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Restrict to one priority: HIGH, MEDIUM, LOW or ALL
    #[arg(long, default_value = "ALL", value_parser = parse_priority)]
    pub priority: PriorityFilter,

    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_priority(value: &str) -> Result<PriorityFilter, String> {
    PriorityFilter::parse(value).ok_or_else(|| format!("unknown priority '{}'", value))
}

#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Configuration file to check
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "riskdeck", "-vv", "generate", "--data", "a.json", "--company", "Acme", "--no-ai", "--html-name", "x.html",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Generate(args) => {
                let o = args.overrides(true);
                assert_eq!(o.data, Some(PathBuf::from("a.json")));
                assert_eq!(o.company.as_deref(), Some("Acme"));
                assert_eq!(o.html_name.as_deref(), Some("x.html"));
                assert!(o.no_ai);
                assert!(o.quiet);
                assert!(o.provider.is_none());
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_summarize_defaults() {
        let cli = Cli::try_parse_from(["riskdeck", "summarize", "--json"]).unwrap();
        match cli.command {
            Commands::Summarize(args) => {
                assert_eq!(args.data, PathBuf::from("audit_data.json"));
                assert_eq!(args.top, 10);
                assert_eq!(args.priority, PriorityFilter::All);
                assert!(args.json);
            }
            _ => panic!("expected summarize"),
        }
    }

    #[test]
    fn test_summarize_priority_flag() {
        let cli = Cli::try_parse_from(["riskdeck", "summarize", "--priority", "high"]).unwrap();
        match cli.command {
            Commands::Summarize(args) => {
                assert_eq!(args.priority, PriorityFilter::Level(crate::models::PriorityLevel::High))
            }
            _ => panic!("expected summarize"),
        }
        assert!(Cli::try_parse_from(["riskdeck", "summarize", "--priority", "urgent"]).is_err());
    }

    #[test]
    fn test_validate_requires_path() {
        assert!(Cli::try_parse_from(["riskdeck", "validate"]).is_err());
    }
}
