mod commands;
mod output;
mod prompt;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kmtscraper_lib::CrawlConfig;

#[derive(Parser)]
#[command(name = "kmtscraper")]
#[command(about = "Crawl reaction SMILES and molecule data from the KMT reaction archive")]
struct Cli {
    /// Archive host, overriding KMT_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl collections and save their reaction records as JSON
    Scrape(commands::scrape::ScrapeArgs),
    /// List the reaction data collections on the archive root
    List(commands::list::ListArgs),
    /// Resolve a single detail page into a record
    Resolve(commands::resolve::ResolveArgs),
    /// Extract reaction data from a local XML payload
    Extract(commands::extract::ExtractArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kmtscraper=info".parse()?)
                .add_directive("kmt_archive=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = CrawlConfig::from_env();
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }

    match &cli.command {
        Commands::Scrape(args) => commands::scrape::run(args, config).await?,
        Commands::List(args) => commands::list::run(args, config).await?,
        Commands::Resolve(args) => commands::resolve::run(args, config).await?,
        Commands::Extract(args) => commands::extract::run(args)?,
    }

    Ok(())
}
