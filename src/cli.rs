// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
//   catalog-harvester scrape [--quota 100] [--pagination fixed] ...
//   catalog-harvester export [--limit 100] [--output products.csv]
//
// Database settings and the default category URL come from the environment
// (see config.rs); flags here only shape a single run.
// =============================================================================

use crate::scrape::{FixedSecondPage, Incrementing, ListingStrategy};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "catalog-harvester",
    version = "0.1.0",
    about = "Scrape a product category into Postgres and export the latest products to CSV",
    long_about = "catalog-harvester walks the listing pages of a product category, scrapes every \
                  product detail page it finds until a quota is reached, stores each product in \
                  Postgres and finally writes the most recent products to a CSV file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape the category, store products, then export the CSV snapshot
    ///
    /// Example: catalog-harvester scrape --category-url https://shop.example/p/phones
    Scrape {
        /// Listing page to start from (default: the categoryURL environment variable)
        #[arg(long)]
        category_url: Option<String>,

        /// Number of products to scrape before stopping
        #[arg(long, default_value_t = 100)]
        quota: usize,

        /// How listing pages after the first are addressed
        #[arg(long, value_enum, default_value_t = Pagination::Fixed)]
        pagination: Pagination,

        /// Give up on the quota after this many listing pages in a row yield no products
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..))]
        max_empty_pages: u64,

        /// CSV file written at the end of the run
        #[arg(long, default_value = "products.csv")]
        output: PathBuf,

        /// Per-request timeout in seconds (default: no timeout)
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Keep products in memory instead of Postgres
        #[arg(long)]
        dry_run: bool,

        /// Print the run report as JSON instead of a summary line
        #[arg(long)]
        json: bool,
    },

    /// Write the most recent stored products to CSV without scraping
    Export {
        /// Number of products to export, newest first
        #[arg(long, default_value_t = 100)]
        limit: usize,

        /// CSV file to write
        #[arg(long, default_value = "products.csv")]
        output: PathBuf,
    },
}

/// Listing URL scheme for pages after the first.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pagination {
    /// Every later page requests `page=2`
    Fixed,
    /// Page n requests `page=n`
    Incrementing,
}

impl Pagination {
    pub fn strategy(self) -> Box<dyn ListingStrategy> {
        match self {
            Pagination::Fixed => Box::new(FixedSecondPage),
            Pagination::Incrementing => Box::new(Incrementing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn test_scrape_defaults() {
        let cli = Cli::parse_from(["catalog-harvester", "scrape"]);
        match cli.command {
            Commands::Scrape {
                quota,
                pagination,
                max_empty_pages,
                output,
                timeout_secs,
                dry_run,
                ..
            } => {
                assert_eq!(quota, 100);
                assert_eq!(pagination, Pagination::Fixed);
                assert_eq!(max_empty_pages, 3);
                assert_eq!(output, PathBuf::from("products.csv"));
                assert_eq!(timeout_secs, None);
                assert!(!dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_zero_max_empty_pages_is_rejected() {
        let result = Cli::try_parse_from(["catalog-harvester", "scrape", "--max-empty-pages", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_pagination_maps_to_strategy() {
        let base = Url::parse("https://shop.test/p").unwrap();
        let url = Pagination::Incrementing.strategy().listing_url(&base, 5);
        assert_eq!(url.as_str(), "https://shop.test/p?page=5");
    }
}
