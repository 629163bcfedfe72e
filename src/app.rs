// src/app.rs
use anyhow::{Context, Result};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::application::{PriceTracker, RunSummary};
use crate::config::Config;
use crate::infrastructure::http::{HttpPageFetcher, PageFetcher};
use crate::infrastructure::messaging::{LogNotifier, Notifier, TwilioNotifier};
use crate::infrastructure::storage::{ObservationLog, PriceHistoryStore};
use crate::shared::config::TwilioCredentials;
use crate::shared::errors::AppError;

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub config: Config,
    pub dry_run: bool,
    pub interval: Option<Duration>,
    pub strict: bool,
}

impl AppCfg {
    pub fn from_config(config: Config, dry_run: bool) -> Self {
        Self {
            config,
            dry_run,
            interval: None,
            strict: false,
        }
    }
}

/// Build the run context. Credentials are checked here, before any page is fetched.
pub fn build_tracker(app_cfg: &AppCfg) -> Result<PriceTracker> {
    let cfg = &app_cfg.config;

    fs::create_dir_all(&cfg.storage.base_dir)
        .with_context(|| format!("create base dir {}", cfg.storage.base_dir.display()))?;

    let fetcher: Arc<dyn PageFetcher> =
        Arc::new(HttpPageFetcher::new(&cfg.fetch).map_err(AppError::from)?);

    let (notifier, recipient): (Arc<dyn Notifier>, String) = if app_cfg.dry_run {
        (Arc::new(LogNotifier), "dry-run".to_string())
    } else {
        let credentials = TwilioCredentials::from_env().map_err(AppError::from)?;
        let twilio = TwilioNotifier::new(credentials, cfg.notify.channel_prefix.clone())
            .map_err(AppError::from)?;
        let recipient = twilio.default_recipient().to_string();
        (Arc::new(twilio), recipient)
    };

    let tracker = PriceTracker::new(
        cfg.products.clone(),
        fetcher,
        notifier,
        recipient,
        PriceHistoryStore::new(cfg.storage.price_history_path()),
        ObservationLog::new(cfg.storage.observation_log_path()),
    )
    .with_pacing(cfg.pacing.clone())
    .with_currency(cfg.notify.currency.clone());

    Ok(tracker)
}

/// Run once, or every `interval` until interrupted. Returns the last run's summary.
pub async fn run(app_cfg: AppCfg) -> Result<RunSummary> {
    info!("Starting price tracker for {} products", app_cfg.config.products.len());
    if app_cfg.dry_run {
        warn!("Dry run - alerts are logged, not sent");
    }

    let tracker = build_tracker(&app_cfg)?;

    match app_cfg.interval {
        None => Ok(tracker.run_once().await?),
        Some(period) => run_polling_mode(&tracker, period).await,
    }
}

async fn run_polling_mode(tracker: &PriceTracker, period: Duration) -> Result<RunSummary> {
    info!("Running in polling mode every {}s", period.as_secs());

    let mut interval = tokio::time::interval(period);
    let mut last = RunSummary::default();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                last = tracker.run_once().await?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping after last completed run");
                return Ok(last);
            }
        }
    }
}
