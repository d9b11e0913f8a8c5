//! CLI subcommand implementations.

pub mod extract;
pub mod list;
pub mod resolve;
pub mod scrape;
