//! Title and price extraction from product page markup

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::price_normalizer::normalize_price;
use super::ExtractedPrice;

/// One way of locating price text in a parsed page
pub type PriceStrategy = fn(&Html) -> Option<String>;

const TITLE_SELECTOR: &str = "#productTitle";

const LEGACY_PRICE_BLOCKS: [&str; 3] = [
    "#priceblock_ourprice",
    "#priceblock_dealprice",
    "#priceblock_saleprice",
];

/// Strategies in priority order. The first one returning text wins.
pub const PRICE_STRATEGIES: [(&str, PriceStrategy); 4] = [
    ("legacy_price_block", legacy_price_block),
    ("meta_itemprop", meta_itemprop_price),
    ("offscreen_span", offscreen_price),
    ("whole_fraction", whole_and_fraction),
];

/// Extract the product title and normalized price from raw markup.
///
/// The title falls back to `fallback_name` when the page has none. A page
/// without any recognizable price, or with price text that does not parse,
/// yields `price: None`.
pub fn extract(markup: &str, fallback_name: &str) -> ExtractedPrice {
    let document = Html::parse_document(markup);

    let title = first_text(&document, TITLE_SELECTOR)
        .unwrap_or_else(|| fallback_name.to_string());

    let price = locate_price_text(&document).and_then(|(strategy, text)| {
        let parsed = normalize_price(&text);
        debug!("price text {:?} via {} -> {:?}", text, strategy, parsed);
        parsed
    });

    ExtractedPrice { title, price }
}

/// Run the strategy chain, returning the winning strategy name and its text
pub fn locate_price_text(document: &Html) -> Option<(&'static str, String)> {
    PRICE_STRATEGIES
        .iter()
        .find_map(|(name, strategy)| strategy(document).map(|text| (*name, text)))
}

fn legacy_price_block(document: &Html) -> Option<String> {
    LEGACY_PRICE_BLOCKS
        .iter()
        .find_map(|css| first_text(document, css))
}

fn meta_itemprop_price(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[itemprop="price"]"#).ok()?;
    let element = document.select(&selector).next()?;
    element
        .value()
        .attr("content")
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

fn offscreen_price(document: &Html) -> Option<String> {
    first_text(document, "span.a-offscreen")
}

fn whole_and_fraction(document: &Html) -> Option<String> {
    let whole = first_text(document, "span.a-price-whole")?;
    let fraction = first_text(document, "span.a-price-fraction")?;
    // The whole part is often rendered with its own trailing decimal point.
    let whole = whole.trim_end_matches('.');
    Some(format!("{}.{}", whole, fraction))
}

/// Text of the first element matching `css`, `None` when absent or blank
fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("")
}
