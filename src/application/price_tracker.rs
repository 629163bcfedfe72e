//! The run loop: fetch, extract, log, compare, notify, record

use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::PacingCfg;
use crate::domain::alert::{self, AlertDecision};
use crate::domain::price;
use crate::infrastructure::http::PageFetcher;
use crate::infrastructure::messaging::Notifier;
use crate::infrastructure::storage::{ObservationLog, PriceHistoryStore};
use crate::shared::errors::AppError;
use crate::shared::types::{Observation, PriceHistory, Product};
use crate::shared::utils::{fixed_width, format_optional_price, generate_id, jittered_delay};
use super::RunSummary;

/// Where a product is within one pass of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Extracted,
    Logged,
    Compared,
    Notified,
    Skipped,
    Recorded,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Fetching => "fetching",
            Stage::Extracted => "extracted",
            Stage::Logged => "logged",
            Stage::Compared => "compared",
            Stage::Notified => "notified",
            Stage::Skipped => "skipped",
            Stage::Recorded => "recorded",
        };
        f.write_str(s)
    }
}

/// Explicitly constructed run context. Everything a run touches is owned here.
pub struct PriceTracker {
    products: Vec<Product>,
    fetcher: Arc<dyn PageFetcher>,
    notifier: Arc<dyn Notifier>,
    recipient: String,
    history: PriceHistoryStore,
    log: ObservationLog,
    pacing: PacingCfg,
    currency: String,
}

impl PriceTracker {
    pub fn new(
        products: Vec<Product>,
        fetcher: Arc<dyn PageFetcher>,
        notifier: Arc<dyn Notifier>,
        recipient: impl Into<String>,
        history: PriceHistoryStore,
        log: ObservationLog,
    ) -> Self {
        Self {
            products,
            fetcher,
            notifier,
            recipient: recipient.into(),
            history,
            log,
            pacing: PacingCfg::default(),
            currency: "MXN".to_string(),
        }
    }

    pub fn with_pacing(mut self, pacing: PacingCfg) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// One full pass over the configured products.
    ///
    /// Fetch and notification failures are counted and the loop moves on.
    /// Storage failures abort the run; the history snapshot is then left as
    /// it was before the run, while the observation log keeps whatever rows
    /// were already appended.
    pub async fn run_once(&self) -> Result<RunSummary, AppError> {
        let run_id = generate_id();
        info!("run {} starting over {} products", run_id, self.products.len());

        let last_seen = self.history.load()?;
        let mut next_seen = PriceHistory::new();
        let mut summary = RunSummary::default();

        for (index, product) in self.products.iter().enumerate() {
            self.process(product, &last_seen, &mut next_seen, &mut summary).await?;

            if index + 1 < self.products.len() {
                self.pause().await;
            }
        }

        self.history.save(&next_seen)?;
        info!("run {} finished: {}", run_id, summary);
        Ok(summary)
    }

    async fn process(
        &self,
        product: &Product,
        last_seen: &PriceHistory,
        next_seen: &mut PriceHistory,
        summary: &mut RunSummary,
    ) -> Result<Stage, AppError> {
        enter(product, Stage::Fetching);
        let markup = match self.fetcher.fetch(&product.url).await {
            Ok(markup) => markup,
            Err(e) => {
                error!("✖ Error fetching {}: {}", product.name, e);
                summary.failed += 1;
                enter(product, Stage::Skipped);
                return Ok(Stage::Skipped);
            }
        };

        let extracted = price::extract(&markup, &product.name);
        enter(product, Stage::Extracted);
        if extracted.price.is_none() {
            warn!("no price found for {} at {}", product.name, product.url);
        }

        let observation = Observation::now(product, extracted.price);
        self.log.append(&observation)?;
        enter(product, Stage::Logged);
        summary.processed += 1;
        info!(
            "{} | {} | {}",
            observation.timestamp_rfc3339(),
            fixed_width(&extracted.title, 30),
            format_optional_price(extracted.price)
        );

        let previous = last_seen.get(&product.name).copied();
        let decision = product.policy.evaluate(extracted.price, previous, product.threshold);
        enter(product, Stage::Compared);
        debug!("{} ({} policy): {:?}", product.name, product.policy.as_str(), decision);

        let outcome = match (extracted.price, decision) {
            (Some(current), decision) if decision.should_notify() => {
                log_decision(&decision);
                match alert::compose(&decision, &extracted.title, current, &self.currency) {
                    Some(body) => match self.notifier.notify(&body, &self.recipient).await {
                        Ok(()) => {
                            summary.alerts_sent += 1;
                            Stage::Notified
                        }
                        Err(e) => {
                            error!("✖ Alert for {} failed: {}", product.name, e);
                            summary.alert_failures += 1;
                            Stage::Skipped
                        }
                    },
                    None => Stage::Skipped,
                }
            }
            _ => Stage::Skipped,
        };
        enter(product, outcome);

        if let Some(current) = extracted.price {
            next_seen.insert(product.name.clone(), current);
        }
        enter(product, Stage::Recorded);
        Ok(outcome)
    }

    async fn pause(&self) {
        let delay = jittered_delay(self.pacing.min_delay_secs, self.pacing.max_delay_secs);
        if !delay.is_zero() {
            debug!("sleeping {:.1}s before next product", delay.as_secs_f64());
            tokio::time::sleep(delay).await;
        }
    }
}

fn enter(product: &Product, stage: Stage) {
    debug!("{} -> {}", product.name, stage);
}

fn log_decision(decision: &AlertDecision) {
    match decision {
        AlertDecision::FirstSeen => info!("First check for this item → sending initial alert"),
        AlertDecision::Changed { delta, .. } => info!(
            "Price changed ({}{:.2}) → sending alert",
            alert::direction(*delta),
            delta.abs()
        ),
        AlertDecision::AtOrBelowThreshold { threshold } => {
            info!("Price at or below {:.2} → sending alert", threshold)
        }
        AlertDecision::Skip => {}
    }
}
