//! The `list` subcommand: show the collections linked from the archive root.

use anyhow::Result;
use clap::Args;
use kmtscraper_lib::{ArchiveLister, BrowserContext, ChromiumBrowser, CrawlConfig};

use crate::output;

#[derive(Args)]
pub struct ListArgs {
    /// Print the collection URLs as a JSON array instead of a table
    #[arg(long)]
    pub json: bool,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,
}

pub async fn run(args: &ListArgs, mut config: CrawlConfig) -> Result<()> {
    if args.headless {
        config.headless = true;
    }

    let mut browser = ChromiumBrowser::launch(&config.chromium_options()).await?;
    let listed = ArchiveLister::from_config(&config).list(&mut browser).await;
    if let Err(e) = browser.close().await {
        tracing::warn!("Failed to close browser: {}", e);
    }
    let collections = listed?;

    if collections.is_empty() {
        eprintln!("No reaction data collections found.");
        return Ok(());
    }
    if args.json {
        output::print_json(&collections);
    } else {
        output::print_collections_table(&collections);
    }
    Ok(())
}
