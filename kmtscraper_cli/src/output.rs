use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use kmtscraper_lib::types::{ArchiveResult, CollectionRef, ReactionRecord};
use kmtscraper_lib::CrawlProgress;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Where `scrape` writes its records unless told otherwise.
pub const DEFAULT_OUTPUT: &str = "kmt_CRDoutput.json";

/// Characters of reaction SMILES shown per record while crawling.
const PREVIEW_CHARS: usize = 50;

#[derive(Tabled, Serialize)]
struct CollectionRow {
    #[tabled(rename = "#")]
    #[serde(rename = "#")]
    index: usize,
    #[tabled(rename = "Collection")]
    #[serde(rename = "Collection")]
    collection: String,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Collection")]
    collection: String,
    #[tabled(rename = "Records")]
    records: usize,
}

fn build_collection_rows(collections: &[CollectionRef]) -> Vec<CollectionRow> {
    collections
        .iter()
        .enumerate()
        .map(|(i, c)| CollectionRow {
            index: i + 1,
            collection: c.clone(),
        })
        .collect()
}

fn build_summary_rows(result: &ArchiveResult) -> Vec<SummaryRow> {
    result
        .iter()
        .map(|(collection, records)| SummaryRow {
            collection: collection.clone(),
            records: records.len(),
        })
        .collect()
}

pub fn print_collections_table(collections: &[CollectionRef]) {
    let rows = build_collection_rows(collections);
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

/// Per-collection record counts of a finished run.
pub fn print_summary(result: &ArchiveResult) {
    let rows = build_summary_rows(result);
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
    println!(
        "{} records from {} collections",
        result.total_records(),
        result.len()
    );
}

// -- JSON output --

/// Pretty JSON with two-space indentation and non-ASCII kept literal.
pub fn to_pretty_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).context("Failed to serialize to JSON")
}

pub fn print_json<T: Serialize>(data: &T) {
    match to_pretty_json(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("{:#}", e),
    }
}

/// Writes the run's records to `path` as UTF-8 JSON.
pub fn write_json(path: &Path, result: &ArchiveResult) -> Result<()> {
    let json = to_pretty_json(result)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

// -- Progress --

/// Renders crawl progress on stderr with a spinner.
pub struct ProgressDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {spinner} {pos} records {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

impl Default for ProgressDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlProgress for ProgressDisplay {
    fn collection_started(&self, index: usize, total: usize, collection: &CollectionRef) {
        self.bar
            .println(format!("[{}/{}] Processing: {}", index, total, collection));
    }

    fn page_scanned(&self, page: u32, links: usize) {
        self.bar
            .set_message(format!("page {}: scanning {} reactions", page, links));
    }

    fn record_resolved(&self, record: &ReactionRecord) {
        self.bar.inc(1);
        self.bar
            .println(format!("  Processed: {}", record.smiles_preview(PREVIEW_CHARS)));
    }

    fn record_skipped(&self, detail_url: &str) {
        self.bar.println(format!("  Skipped: {}", detail_url));
    }

    fn collection_finished(&self, _index: usize, _collection: &CollectionRef, records: usize) {
        self.bar
            .println(format!("  {} records from this collection", records));
    }
}
