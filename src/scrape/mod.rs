// src/scrape/mod.rs
// =============================================================================
// The crawl-and-extract pipeline.
//
// Pieces, from the bottom up:
// - resolve:    unwraps redirector links to the real product URL
// - extract:    reads the product fields out of a detail page
// - fetch:      HTTP GET with a browser User-Agent
// - detail:     one product: resolve, fetch, extract, store
// - walker:     one listing page: find cards, fan out detail workers, join
// - pagination: which URL each listing page lives at
// - driver:     page loop until the quota is met, then export
// =============================================================================

mod detail;
mod driver;
mod extract;
mod fetch;
mod pagination;
mod resolve;
mod walker;

#[cfg(test)]
mod fixture;

pub use detail::DetailWorker;
pub use driver::{PipelineDriver, RunReport};
pub use walker::CategoryWalker;
pub use fetch::HttpFetcher;
pub use pagination::{FixedSecondPage, Incrementing, ListingStrategy};
