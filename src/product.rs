// src/product.rs
// =============================================================================
// The record we extract from every product detail page.
//
// All six fields are plain strings. A field the page did not have is an empty
// string, never an error: a half-filled record is still stored.
// =============================================================================

use serde::{Deserialize, Serialize};

/// Column header of the CSV snapshot, in `csv_row()` order.
pub const CSV_HEADER: [&str; 6] = ["Name", "Description", "ImageLink", "Price", "Rating", "StoreName"];

/// One product as shown on its detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    /// Plain text, `<br>` turned into newlines and every other tag removed
    pub description: String,
    pub image_link: String,
    /// Display text exactly as the site formats it (currency included)
    pub price: String,
    pub rating: String,
    pub store_name: String,
}

impl ProductRecord {
    /// Fields in the same order as `CSV_HEADER`
    pub fn csv_row(&self) -> [&str; 6] {
        [
            &self.name,
            &self.description,
            &self.image_link,
            &self.price,
            &self.rating,
            &self.store_name,
        ]
    }

    /// True when no selector matched anything at all
    pub fn is_empty(&self) -> bool {
        self.csv_row().iter().all(|field| field.is_empty())
    }
}
