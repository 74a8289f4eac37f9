// src/scrape/driver.rs
// =============================================================================
// The pipeline driver: pages through the category until the quota is met,
// then exports.
//
// States:
//
//   Paging ──(dispatched >= quota, or too many empty pages)──> Exporting ──> Done
//     ^  |
//     └──┘ next page
//
// All run state lives in a PipelineRun value owned by the driver and passed
// to the walker by value, so two runs never share counters.
// =============================================================================

use super::pagination::ListingStrategy;
use super::walker::CategoryWalker;
use crate::export::Exporter;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

/// Counters of one run. Created at start, dropped when the run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineRun {
    pub dispatched: usize,
    pub quota: usize,
    /// 1-based number of the next listing page to fetch
    pub page_cursor: usize,
    /// Listing pages in a row that dispatched nothing
    pub empty_streak: usize,
}

impl PipelineRun {
    pub fn new(quota: usize) -> Self {
        Self {
            dispatched: 0,
            quota,
            page_cursor: 1,
            empty_streak: 0,
        }
    }

    pub fn quota_reached(&self) -> bool {
        self.dispatched >= self.quota
    }

    pub fn pages_fetched(&self) -> usize {
        self.page_cursor - 1
    }

    /// Records the count returned by one listing page walk
    pub fn record_page(&mut self, dispatched: usize) {
        if dispatched == self.dispatched {
            self.empty_streak += 1;
        } else {
            self.empty_streak = 0;
        }
        self.dispatched = dispatched;
        self.page_cursor += 1;
    }
}

// Where the driver is in a run
enum RunState {
    Paging,
    Exporting,
    Done(RunReport),
}

/// Outcome of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub dispatched: usize,
    pub quota: usize,
    pub pages_fetched: usize,
    pub quota_reached: bool,
    /// Rows written by the export stage, when it succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_error: Option<String>,
}

impl RunReport {
    /// Quota met and snapshot written
    pub fn is_success(&self) -> bool {
        self.quota_reached && self.export_error.is_none()
    }

    /// One human-readable line describing how the run ended
    pub fn summary(&self) -> String {
        if let Some(error) = &self.export_error {
            format!("Error exporting to CSV: {}", error)
        } else if !self.quota_reached {
            format!(
                "Scraping stopped after {} page(s) with {} of {} products; export completed.",
                self.pages_fetched, self.dispatched, self.quota
            )
        } else {
            "Scraping and export completed successfully.".to_string()
        }
    }
}

pub struct PipelineDriver {
    walker: CategoryWalker,
    strategy: Box<dyn ListingStrategy>,
    exporter: Arc<dyn Exporter>,
    base_url: Url,
    /// Consecutive empty listing pages tolerated before giving up on the quota
    max_empty_pages: usize,
}

impl PipelineDriver {
    pub fn new(
        walker: CategoryWalker,
        strategy: Box<dyn ListingStrategy>,
        exporter: Arc<dyn Exporter>,
        base_url: Url,
        max_empty_pages: usize,
    ) -> Self {
        Self {
            walker,
            strategy,
            exporter,
            base_url,
            max_empty_pages,
        }
    }

    /// Runs one full scrape. Never fails: per-item problems are logged by the
    /// workers and an export failure is reported in the returned summary.
    pub async fn run(&self) -> RunReport {
        let mut run = PipelineRun::new(self.walker.quota());
        let mut state = RunState::Paging;

        loop {
            state = match state {
                RunState::Paging if run.quota_reached() => RunState::Exporting,
                RunState::Paging if run.empty_streak >= self.max_empty_pages => {
                    tracing::warn!(
                        pages = run.pages_fetched(),
                        empty_pages = run.empty_streak,
                        dispatched = run.dispatched,
                        quota = run.quota,
                        "Listing pages stopped yielding products before the quota"
                    );
                    RunState::Exporting
                }
                RunState::Paging => {
                    let url = self.strategy.listing_url(&self.base_url, run.page_cursor);
                    tracing::info!(%url, page = run.page_cursor, "Scraping data from listing page");

                    let dispatched = self.walker.walk(&url, run.dispatched).await;
                    run.record_page(dispatched);
                    RunState::Paging
                }
                RunState::Exporting => {
                    tracing::info!(dispatched = run.dispatched, "Scraping finished, exporting");
                    let export = self.exporter.export_latest(run.quota).await;
                    if let Err(e) = &export {
                        tracing::error!(error = %e, "Export failed");
                    }

                    RunState::Done(RunReport {
                        dispatched: run.dispatched,
                        quota: run.quota,
                        pages_fetched: run.pages_fetched(),
                        quota_reached: run.quota_reached(),
                        exported: export.as_ref().ok().copied(),
                        export_error: export.err().map(|e| e.to_string()),
                    })
                }
                RunState::Done(report) => return report,
            };
        }
    }
}
