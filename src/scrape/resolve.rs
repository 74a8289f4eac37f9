// src/scrape/resolve.rs
// =============================================================================
// Turns a product link found on a listing page into the real detail-page URL.
//
// Listing pages often wrap product links in a tracking redirector:
//
//   https://ta.example.com/promo?r=https%3A%2F%2Fexample.com%2Fshop%2Fphone
//
// The destination sits URL-encoded in the `r` query parameter. We unwrap it
// locally instead of following the redirect over the network.
// =============================================================================

use url::Url;

// Name of the query parameter that carries the wrapped destination
const REDIRECT_PARAM: &str = "r";

/// Returns the canonical detail URL for `raw_href`.
///
/// Never fails: when the href is not a URL or has no (non-empty) `r`
/// parameter, the input comes back unchanged.
pub fn resolve(raw_href: &str) -> String {
    let parsed = match Url::parse(raw_href) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(href = raw_href, error = %e, "Could not parse product link, using it as is");
            return raw_href.to_string();
        }
    };

    // query_pairs() percent-decodes both keys and values for us
    let target = parsed
        .query_pairs()
        .find(|(key, value)| key == REDIRECT_PARAM && !value.is_empty())
        .map(|(_, value)| value.into_owned());

    match target {
        Some(url) => {
            tracing::debug!(href = raw_href, target = %url, "Unwrapped redirect link");
            url
        }
        None => {
            tracing::debug!(href = raw_href, "No 'r' parameter, using default url");
            raw_href.to_string()
        }
    }
}
