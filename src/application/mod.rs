//! Application layer - the tracking run and its outcome

mod price_tracker;
mod run_summary;

pub use price_tracker::{PriceTracker, Stage};
pub use run_summary::RunSummary;
