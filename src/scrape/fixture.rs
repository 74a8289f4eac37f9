// src/scrape/fixture.rs
// In-memory fake of the target shop for tests: canned pages keyed by URL and
// a hit counter per URL. Unknown URLs answer 404.

use super::fetch::{FetchError, PageFetcher};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct FixtureSite {
    pages: Mutex<HashMap<String, String>>,
    failing: Mutex<HashSet<String>>,
    hits: Mutex<HashMap<String, usize>>,
}

impl FixtureSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&self, url: &str, html: String) {
        self.pages.lock().unwrap().insert(url.to_string(), html);
    }

    /// Makes `url` fail with a network error
    pub fn fail(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    pub fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    /// Requests whose URL starts with `prefix`
    pub fn hits_with_prefix(&self, prefix: &str) -> usize {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .filter(|(url, _)| url.starts_with(prefix))
            .map(|(_, count)| count)
            .sum()
    }
}

#[async_trait]
impl PageFetcher for FixtureSite {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        *self.hits.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;

        if self.failing.lock().unwrap().contains(url) {
            return Err(FetchError::Network("connection reset".to_string()));
        }

        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}

pub fn item_url(id: usize) -> String {
    format!("https://shop.test/item/{id}")
}

/// Listing page with one card per id, each wrapped in the ad redirector
pub fn listing_page(ids: impl IntoIterator<Item = usize>) -> String {
    let cards: String = ids
        .into_iter()
        .map(|id| {
            format!(
                r#"<div class="css-bk6tzz e1nlzfl2"><a href="https://ads.test/click?r=https%3A%2F%2Fshop.test%2Fitem%2F{id}">Product {id}</a></div>"#
            )
        })
        .collect();
    format!("<html><body>{cards}</body></html>")
}

pub fn detail_page(id: usize) -> String {
    format!(
        r#"<html><body>
            <h1 class="css-1os9jjn">Product {id}</h1>
            <img class="css-1c345mg" src="https://images.shop.test/{id}.jpg">
            <div data-testid="lblPDPDescriptionProduk">Item {id}<br>In stock</div>
            <div data-testid="lblPDPDetailProductPrice">Rp{id}.000</div>
            <div data-testid="lblPDPDetailRatingNumber">4.{id}</div>
            <h2 class="css-1wdzqxj-unf-heading e1qvo2ff2">Store {id}</h2>
        </body></html>"#
    )
}
