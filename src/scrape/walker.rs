// src/scrape/walker.rs
// =============================================================================
// The category walker: scrapes one listing page.
//
// How it works:
// 1. Fetch the listing page once
// 2. Find every product card, in document order
// 3. Spawn one detail worker per card link, counting as we go
// 4. Stop spawning the moment the run's quota is reached, even mid-page
// 5. Wait for every worker spawned for this page, then report the new total
//
// Waiting at the end of each page keeps at most one page's worth of requests
// in flight, while the products on a page are still scraped in parallel.
//
// The walker keeps no counters of its own. The caller passes in how many
// products were dispatched so far and gets the updated number back.
// =============================================================================

use super::detail::DetailWorker;
use super::fetch::PageFetcher;
use futures::stream::{FuturesUnordered, StreamExt};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::sync::Arc;
use url::Url;

static PRODUCT_CARD: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".css-bk6tzz.e1nlzfl2").unwrap_or_else(|e| panic!("invalid card selector: {e:?}"))
});
static CARD_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").unwrap_or_else(|e| panic!("invalid link selector: {e:?}")));

pub struct CategoryWalker {
    fetcher: Arc<dyn PageFetcher>,
    worker: DetailWorker,
    quota: usize,
}

impl CategoryWalker {
    pub fn new(fetcher: Arc<dyn PageFetcher>, worker: DetailWorker, quota: usize) -> Self {
        Self {
            fetcher,
            worker,
            quota,
        }
    }

    pub fn quota(&self) -> usize {
        self.quota
    }

    /// Scrapes one listing page and returns the cumulative dispatch count.
    ///
    /// The count reflects dispatched workers, not successful ones. If the
    /// listing page itself cannot be fetched, `already_dispatched` comes back
    /// unchanged.
    pub async fn walk(&self, listing_url: &Url, already_dispatched: usize) -> usize {
        let html = match self.fetcher.fetch(listing_url.as_str()).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(url = %listing_url, error = %e, "Error fetching listing page");
                return already_dispatched;
            }
        };

        let references = discover_references(&Html::parse_document(&html), listing_url);
        tracing::debug!(url = %listing_url, cards = references.len(), "Discovered product links");

        let mut total = already_dispatched;
        let mut in_flight = FuturesUnordered::new();

        for reference in references {
            if total >= self.quota {
                tracing::debug!(quota = self.quota, "Quota reached, ignoring the rest of the page");
                break;
            }

            let worker = self.worker.clone();
            in_flight.push(tokio::spawn(async move { worker.process(&reference).await }));
            total += 1;
            tracing::debug!(counter = total, "Dispatched product");
        }

        // Join barrier: nothing from the next page starts before these finish
        let dispatched = in_flight.len();
        let mut stored = 0;
        while let Some(joined) = in_flight.next().await {
            match joined {
                Ok(Ok(_)) => stored += 1,
                // Already logged by the worker
                Ok(Err(_)) => {}
                Err(e) => tracing::error!(error = %e, "Detail worker task panicked"),
            }
        }

        tracing::info!(url = %listing_url, dispatched, stored, total, "Listing page done");
        total
    }
}

/// Product links of a listing page, in document order.
///
/// One link per card: the first `<a href>` inside it. Cards without a link
/// are skipped. Relative links are made absolute against `page_url`.
pub fn discover_references(document: &Html, page_url: &Url) -> Vec<String> {
    document
        .select(&PRODUCT_CARD)
        .filter_map(|card| card.select(&CARD_LINK).next())
        .filter_map(|link| link.value().attr("href"))
        .map(|href| match page_url.join(href) {
            Ok(url) => url.to_string(),
            Err(_) => href.to_string(),
        })
        .collect()
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why tokio::spawn and not just a stream of futures?
//    - Spawned tasks run on the runtime's worker threads, so extraction of
//      one page (CPU work) does not hold up the network I/O of the others
//    - Each task owns its clone of the worker (two Arcs), nothing is borrowed
//
// 2. What is FuturesUnordered?
//    - A set of futures that yields each result as soon as it is ready
//    - Draining it to the end is the join barrier for the page
//
// 3. What does Err(e) from a JoinHandle mean?
//    - The task panicked (or was cancelled). It still counts as dispatched.
//
// 4. Why is the listing Html parsed in its own statement?
//    - scraper::Html is not Send; it must be gone before the first .await
//      after it, or the walk future could not move between threads
// -----------------------------------------------------------------------------
