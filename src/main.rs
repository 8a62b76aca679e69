use std::time::Duration;

use clap::{Parser, ValueEnum};
use reqwest::Client;
use tracing::info;

use trawl::{Config, Federation, markdown};

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum redirect hops before aborting.
const MAX_REDIRECTS: usize = 5;

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Markdown,
}

/// Search Europeana and CORE at once with a synonym-expanded boolean query.
///
/// Requires EUROPEANA_API_KEY and CORE_API_KEY in the environment.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Query words, joined with spaces
    #[arg(required = true)]
    query: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Print the expanded boolean query to stderr
    #[arg(long)]
    show_query: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trawl=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()
        .inspect_err(|e| tracing::error!("refusing to start: {e}"))?;

    let http = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(config.timeout)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()?;
    let federation = Federation::from_config(http, &config);

    let raw = cli.query.join(" ");
    info!(query = %raw, "starting search");

    let run = federation.run(&raw).await?;
    if cli.show_query {
        eprintln!("{}", run.query);
    }
    let records = run.records;

    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        Format::Markdown => print!("{}", markdown::format_results(&raw, &records)),
    }

    Ok(())
}
