//! The `extract` subcommand: run the tolerant extractor over a local file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use kmtscraper_lib::extract;

use crate::output;

#[derive(Args)]
pub struct ExtractArgs {
    /// XML payload saved from a detail page
    pub file: PathBuf,
}

pub fn run(args: &ExtractArgs) -> Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let extracted = extract(&String::from_utf8_lossy(&bytes));
    if extracted.is_empty() {
        eprintln!("No reaction data found in {}", args.file.display());
    }
    output::print_json(&extracted);
    Ok(())
}
