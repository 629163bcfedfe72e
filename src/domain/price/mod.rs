//! Price domain - extraction and normalization of listing prices

mod price_extractor;
mod price_normalizer;

pub use price_extractor::{extract, locate_price_text, PriceStrategy, PRICE_STRATEGIES};
pub use price_normalizer::normalize_price;

use crate::shared::types::Price;

/// Result of running the extractor over one page
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPrice {
    pub title: String,
    pub price: Option<Price>,
}
