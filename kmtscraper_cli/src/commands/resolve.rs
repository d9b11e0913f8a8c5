//! The `resolve` subcommand: turn one detail page into a record over HTTP.

use anyhow::{bail, Result};
use clap::Args;
use kmtscraper_lib::validation::validate_detail_url;
use kmtscraper_lib::{CrawlConfig, DetailResolver};

use crate::output;

#[derive(Args)]
pub struct ResolveArgs {
    /// Absolute URL of a reaction detail page
    pub url: String,
}

pub async fn run(args: &ResolveArgs, config: CrawlConfig) -> Result<()> {
    let url = validate_detail_url(&args.url)?;
    let client = config.client()?;

    match DetailResolver::new(&client).resolve(&url).await {
        Some(record) => {
            output::print_json(&record);
            Ok(())
        }
        None => bail!("No reaction record could be resolved from {}", url),
    }
}
