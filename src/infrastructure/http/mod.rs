//! HTTP access to product pages

mod page_fetcher;

pub use page_fetcher::{HttpPageFetcher, PageFetcher};
