// src/scrape/extract.rs
// =============================================================================
// Pulls the six product fields out of a parsed detail page.
//
// Every field has its own CSS selector and is looked up independently. When a
// selector matches nothing the field is simply left empty; one missing element
// never stops the other fields from being read.
//
// This module does no I/O. It only looks at an already parsed document, which
// also means extraction is deterministic: the same page always gives the same
// record.
// =============================================================================

use crate::product::ProductRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

// Selectors are compiled once and shared by every worker task.
// They are constants, so a parse failure is a programmer error.
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

static NAME: Lazy<Selector> = Lazy::new(|| selector(".css-1os9jjn"));
static IMAGE: Lazy<Selector> = Lazy::new(|| selector(".css-1c345mg"));
static DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| selector("div[data-testid='lblPDPDescriptionProduk']"));
static STORE_NAME: Lazy<Selector> = Lazy::new(|| selector(".css-1wdzqxj-unf-heading.e1qvo2ff2"));
static RATING: Lazy<Selector> = Lazy::new(|| selector("div[data-testid='lblPDPDetailRatingNumber']"));
// Older page layout kept the rating in a bare `.score` element
static RATING_FALLBACK: Lazy<Selector> = Lazy::new(|| selector(".score"));
static PRICE: Lazy<Selector> = Lazy::new(|| selector("div[data-testid='lblPDPDetailProductPrice']"));

static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap_or_else(|e| panic!("{e}")));
// Quoted attribute values may contain '>'
static ANY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<(?:"[^"]*"|'[^']*'|[^'">])*>"#).unwrap_or_else(|e| panic!("{e}")));

/// Extracts a `ProductRecord` from a detail page document.
pub fn extract(document: &Html) -> ProductRecord {
    let record = ProductRecord {
        name: first(document, &NAME).map(trimmed_text).unwrap_or_default(),
        description: first(document, &DESCRIPTION)
            .map(|el| normalize_description(&el.inner_html()))
            .unwrap_or_default(),
        image_link: first(document, &IMAGE)
            .and_then(|el| el.value().attr("src"))
            .map(str::to_string)
            .unwrap_or_default(),
        price: first(document, &PRICE).map(trimmed_text).unwrap_or_default(),
        rating: first(document, &RATING)
            .or_else(|| first(document, &RATING_FALLBACK))
            .map(trimmed_text)
            .unwrap_or_default(),
        store_name: first(document, &STORE_NAME).map(trimmed_text).unwrap_or_default(),
    };

    if record.name.is_empty() {
        tracing::warn!("Product name not found on detail page");
    }

    record
}

/// Parses raw HTML and extracts from it.
pub fn extract_html(html: &str) -> ProductRecord {
    extract(&Html::parse_document(html))
}

/// Turns the inner markup of the description container into plain text.
///
/// `<br>` tokens become `\n`, every other tag is dropped, entities are
/// decoded and the result is trimmed.
pub fn normalize_description(inner_html: &str) -> String {
    let with_newlines = LINE_BREAK.replace_all(inner_html.trim(), "\n");
    let without_tags = ANY_TAG.replace_all(&with_newlines, "");
    html_escape::decode_html_entities(&without_tags).trim().to_string()
}

fn first<'a>(document: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    document.select(selector).next()
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_PAGE: &str = r#"
        <html><body>
          <h1 class="css-1os9jjn">  Wireless Mouse M170 </h1>
          <img class="css-1c345mg" src="https://images.example.com/m170.jpg">
          <div data-testid="lblPDPDescriptionProduk">
            Compact design<br>2.4 GHz receiver<br/>
            <b>12 months</b> battery &amp; warranty
          </div>
          <h2 class="css-1wdzqxj-unf-heading e1qvo2ff2">Logi Store</h2>
          <div data-testid="lblPDPDetailRatingNumber"> 4.8 </div>
          <div data-testid="lblPDPDetailProductPrice">
            Rp129.000
          </div>
        </body></html>
    "#;

    #[test]
    fn test_extracts_all_fields() {
        let record = extract_html(DETAIL_PAGE);
        assert_eq!(record.name, "Wireless Mouse M170");
        assert_eq!(record.image_link, "https://images.example.com/m170.jpg");
        assert_eq!(record.store_name, "Logi Store");
        assert_eq!(record.rating, "4.8");
        assert_eq!(record.price, "Rp129.000");
        assert!(record.description.starts_with("Compact design\n2.4 GHz receiver\n"));
        assert!(record.description.ends_with("12 months battery & warranty"));
    }

    #[test]
    fn test_description_normalization() {
        assert_eq!(normalize_description("Line1<br>Line2<b>bold</b>"), "Line1\nLine2bold");
    }

    #[test]
    fn test_description_tag_with_gt_in_attribute() {
        assert_eq!(normalize_description(r#"A<span title="x>y">B</span>"#), "AB");
        assert_eq!(normalize_description("A<a href='/q?x>1'>B</a>"), "AB");
    }

    #[test]
    fn test_description_break_variants() {
        assert_eq!(normalize_description("  a<BR>b<br />c<br/>d  "), "a\nb\nc\nd");
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let record = extract_html(r#"<div data-testid="lblPDPDetailProductPrice">$5</div>"#);
        assert_eq!(record.price, "$5");
        assert_eq!(record.name, "");
        assert_eq!(record.description, "");
        assert_eq!(record.image_link, "");
        assert_eq!(record.rating, "");
        assert_eq!(record.store_name, "");
    }

    #[test]
    fn test_rating_falls_back_to_score() {
        let record = extract_html(r#"<span class="score"> 5.0 </span>"#);
        assert_eq!(record.rating, "5.0");
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let document = Html::parse_document(DETAIL_PAGE);
        assert_eq!(extract(&document), extract(&document));
    }

    #[test]
    fn test_empty_page_gives_empty_record() {
        assert!(extract_html("<html></html>").is_empty());
    }
}
