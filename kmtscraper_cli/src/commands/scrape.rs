//! The `scrape` subcommand: crawl the archive into a JSON file.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;
use kmtscraper_lib::types::ArchiveResult;
use kmtscraper_lib::validation::{clamp_limit, validate_max_pages};
use kmtscraper_lib::{ChromiumBrowser, CrawlConfig, Pipeline};

use crate::output::{self, ProgressDisplay, DEFAULT_OUTPUT};
use crate::prompt;

#[derive(Args)]
pub struct ScrapeArgs {
    /// File the records are written to
    #[arg(long, short, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Number of collections to crawl (asked interactively when omitted)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Stop each collection after this many listing pages
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,
}

/// How a crawl attempt ended before anything is written.
enum Outcome {
    Crawled(ArchiveResult),
    NoCollections,
}

pub async fn run(args: &ScrapeArgs, mut config: CrawlConfig) -> Result<()> {
    if let Some(max_pages) = args.max_pages {
        config.max_pages = Some(validate_max_pages(max_pages)?);
    }
    if args.headless {
        config.headless = true;
    }

    let started = Instant::now();
    let client = config.client()?;
    let browser = ChromiumBrowser::launch(&config.chromium_options()).await?;
    let mut pipeline = Pipeline::with_client(browser, client, config);

    let outcome = tokio::select! {
        result = crawl(&mut pipeline, args) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };
    pipeline.close().await;

    let Some(outcome) = outcome else {
        eprintln!("\nInterrupted, browser closed.");
        std::process::exit(130);
    };

    match outcome? {
        Outcome::NoCollections => {
            println!("No reaction data collections found.");
        }
        Outcome::Crawled(result) => {
            output::write_json(&args.output, &result)?;
            output::print_summary(&result);
            println!("Total time: {:.2} seconds", started.elapsed().as_secs_f64());
            println!("Data saved to {}", args.output.display());
        }
    }
    Ok(())
}

async fn crawl(pipeline: &mut Pipeline<ChromiumBrowser>, args: &ScrapeArgs) -> Result<Outcome> {
    let collections = pipeline.list_collections().await?;
    if collections.is_empty() {
        return Ok(Outcome::NoCollections);
    }
    eprintln!("Found {} reaction data collections", collections.len());

    let available = collections.len();
    let limit = match args.limit {
        Some(requested) => clamp_limit(requested, available)?,
        None => tokio::task::spawn_blocking(move || prompt::ask_limit(available)).await??,
    };
    if limit.clamped {
        eprintln!(
            "Only {} collections available. Will scrape all of them.",
            limit.count
        );
    }

    let progress = ProgressDisplay::new();
    let result = pipeline
        .crawl(&collections[..limit.count], &progress)
        .await;
    progress.finish();
    Ok(Outcome::Crawled(result))
}
