use clap::Parser;
use tracing_subscriber::EnvFilter;
use riskdeck::cli::{self, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = cli::Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let result = match cli.command {
        Commands::Generate(args) => cli::generate::handle_generate(args, cli.quiet).await,
        Commands::Summarize(args) => cli::summarize::handle_summarize(args).await,
        Commands::Validate(args) => cli::validate::handle_validate(args, cli.quiet).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
