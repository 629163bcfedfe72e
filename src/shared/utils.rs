//! Utility functions and helpers

use crate::shared::types::Price;
use rand::Rng;
use std::time::Duration;

/// Format a price with two decimals
pub fn format_price(price: Price) -> String {
    format!("{:.2}", price.round_dp(2))
}

/// Format an optional price the way the console line shows it
pub fn format_optional_price(price: Option<Price>) -> String {
    match price {
        Some(p) => format!("${}", format_price(p)),
        None => "$None".to_string(),
    }
}

/// Truncate to at most `max` characters, padding to `max` so console columns line up
pub fn fixed_width(s: &str, max: usize) -> String {
    let truncated: String = s.chars().take(max).collect();
    format!("{:<width$}", truncated, width = max)
}

/// Uniform random delay in `[min_secs, max_secs]`
pub fn jittered_delay(min_secs: f64, max_secs: f64) -> Duration {
    if !min_secs.is_finite() || !max_secs.is_finite() {
        return Duration::ZERO;
    }
    if max_secs <= min_secs {
        return Duration::from_secs_f64(min_secs.max(0.0));
    }
    let secs = rand::thread_rng().gen_range(min_secs..=max_secs);
    Duration::from_secs_f64(secs.max(0.0))
}

/// Generate unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
