//! Common types used across the application

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Price representation. Exact decimal, never a float.
pub type Price = Decimal;

/// Last known price per product name (the history snapshot)
pub type PriceHistory = BTreeMap<String, Price>;

/// Notification policy applied when a new price is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertPolicy {
    /// Alert while the price sits at or below the product threshold
    Threshold,
    /// Alert when the price differs from the last recorded one
    Change,
    /// Like `Change`, plus one alert on the first observation of a product
    #[default]
    ChangeOrFirst,
}

impl AlertPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertPolicy::Threshold => "threshold",
            AlertPolicy::Change => "change",
            AlertPolicy::ChangeOrFirst => "change-or-first",
        }
    }
}

/// A tracked product, loaded once at startup
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub threshold: Option<Price>,
    #[serde(default)]
    pub policy: AlertPolicy,
}

impl Product {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            threshold: None,
            policy: AlertPolicy::default(),
        }
    }

    pub fn with_threshold(mut self, threshold: Price) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_policy(mut self, policy: AlertPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// One timestamped price reading. `price` is `None` when extraction failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub url: String,
    pub price: Option<Price>,
}

impl Observation {
    pub fn now(product: &Product, price: Option<Price>) -> Self {
        Self {
            timestamp: Utc::now(),
            name: product.name.clone(),
            url: product.url.clone(),
            price,
        }
    }

    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}
