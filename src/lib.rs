//! Price Watch - listing price tracker
//! Fetches product pages, logs every observed price and alerts on changes

pub mod app;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod application;
pub mod shared;

// Re-export main types for convenience
pub use app::{run, AppCfg};
pub use application::{PriceTracker, RunSummary};
pub use config::Config;
pub use domain::price::{extract, normalize_price};
pub use shared::types::{AlertPolicy, Observation, Price, Product};
