//! skdocs: search the Skript documentation from the command line
//!
//! This is the main entry point for the application.

use anyhow::Result;
use clap::Parser;
use skdocs::{config, network::HttpClient, Provider, ProviderLoader, SearchOptions, SyntaxElement};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const ENVIRONMENT_HELP: &str = "\
ENVIRONMENT VARIABLES:
    SKDOCS_SETTINGS_PATH    Path to settings.yml
    SKDOCS_SKRIPTHUB_TOKEN  Skript Hub API token
    SKDOCS_SKUNITY_KEY      skUnity API key
    SKDOCS_SKRIPTMC_KEY     Skript-MC API key
    SKDOCS_TIMEOUT          Search timeout in seconds
    SKDOCS_MAX_RESULTS      Result limit
    RUST_LOG                Log filter (default: info)";

/// Search the Skript documentation backends
#[derive(Parser, Debug)]
#[command(name = "skdocs", version, about, after_help = ENVIRONMENT_HELP)]
struct Cli {
    /// Load examples for the first result
    #[arg(short, long)]
    examples: bool,

    /// Search terms, joined with spaces
    #[arg(required = true)]
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("Starting skdocs v{}", skdocs::VERSION);

    // Load configuration
    let settings = config::load()?;

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    debug!("HTTP client initialized");

    // Load providers
    let combined = ProviderLoader::load(&settings, client)?;

    let options = SearchOptions::new(cli.query.join(" "));
    let container = combined.search(&options).await;

    for failure in container.get_unresponsive() {
        eprintln!("warning: {} unavailable ({})", failure.name, failure.kind);
    }

    let mut results = container.into_results();
    if results.is_empty() {
        println!("No results for '{}'", options.query);
        return Ok(());
    }

    if cli.examples {
        combined.prepare_element_for_display(&mut results[0]).await?;
    }

    for (index, element) in results.iter().enumerate() {
        print_element(element, cli.examples && index == 0);
    }

    Ok(())
}

fn print_element(element: &SyntaxElement, with_examples: bool) {
    println!("{} [{}]", element.name, element.provider.name());
    println!("  {}", element.detailed_name());
    for pattern in &element.patterns {
        println!("    {}", pattern);
    }
    if !element.description.is_empty() {
        println!("  {}", element.description.replace('\n', "\n  "));
    }
    println!("  {}", element.link);

    if with_examples {
        if let Some(examples) = element.examples().as_slice() {
            for example in examples {
                println!();
                println!("{}", example);
            }
        }
    }
    println!();
}
