use async_trait::async_trait;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use price_watch::config::PacingCfg;
use price_watch::infrastructure::http::PageFetcher;
use price_watch::infrastructure::messaging::Notifier;
use price_watch::infrastructure::storage::{ObservationLog, PriceHistoryStore};
use price_watch::shared::errors::{FetchError, NotifyError};
use price_watch::{AlertPolicy, Config, PriceTracker, Product};

const GOOD_URL: &str = "https://www.amazon.com.mx/gp/product/GOOD";
const BROKEN_URL: &str = "https://www.amazon.com.mx/gp/product/BROKEN";

struct ScriptedFetcher;

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if url == GOOD_URL {
            Ok(r#"<html><body>
                <span id="productTitle">Hidrolavadora K2</span>
                <span class="a-price-whole">1,800<span class="a-price-decimal">.</span></span>
                <span class="a-price-fraction">00</span>
            </body></html>"#
                .to_string())
        } else {
            Err(FetchError::Body { url: url.to_string(), reason: "connection reset".to_string() })
        }
    }
}

#[derive(Default)]
struct Outbox {
    messages: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for Outbox {
    async fn notify(&self, message: &str, _recipient: &str) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

fn scenario(policy: AlertPolicy) -> (TempDir, PriceTracker, Arc<Outbox>) {
    let temp_dir = TempDir::new().unwrap();
    let outbox = Arc::new(Outbox::default());
    let products = vec![
        Product::new("karcher k2", GOOD_URL).with_policy(policy),
        Product::new("Pulidora Orbital Trupper", BROKEN_URL).with_policy(policy),
    ];
    let tracker = PriceTracker::new(
        products,
        Arc::new(ScriptedFetcher),
        outbox.clone(),
        "whatsapp:+5215500000000",
        PriceHistoryStore::new(temp_dir.path().join("AmazonLastPrices.csv")),
        ObservationLog::new(temp_dir.path().join("AmazonProductsPriceDataset.csv")),
    )
    .with_pacing(PacingCfg::none());
    (temp_dir, tracker, outbox)
}

fn observation_names(temp_dir: &TempDir) -> Vec<String> {
    let mut reader = csv::Reader::from_path(temp_dir.path().join("AmazonProductsPriceDataset.csv")).unwrap();
    reader.records().map(|r| r.unwrap()[1].to_string()).collect()
}

#[tokio::test]
async fn first_observation_alerts_and_broken_fetch_is_skipped() {
    let (temp_dir, tracker, outbox) = scenario(AlertPolicy::ChangeOrFirst);

    let summary = tracker.run_once().await.unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.alerts_sent, 1);
    assert_eq!(
        outbox.messages.lock().unwrap()[0],
        "✔️ Hidrolavadora K2\nPrecio: $1800.00 MXN"
    );

    assert_eq!(observation_names(&temp_dir), vec!["karcher k2"]);

    let history = PriceHistoryStore::new(temp_dir.path().join("AmazonLastPrices.csv")).load().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history["karcher k2"], Decimal::from_str("1800.00").unwrap());
}

#[tokio::test]
async fn change_policy_is_silent_on_first_observation() {
    let (temp_dir, tracker, outbox) = scenario(AlertPolicy::Change);

    let summary = tracker.run_once().await.unwrap();

    assert_eq!(summary.alerts_sent, 0);
    assert!(outbox.messages.lock().unwrap().is_empty());
    assert_eq!(observation_names(&temp_dir), vec!["karcher k2"]);
}

#[tokio::test]
async fn second_run_with_same_price_is_silent() {
    let (temp_dir, tracker, outbox) = scenario(AlertPolicy::ChangeOrFirst);

    tracker.run_once().await.unwrap();
    let second = tracker.run_once().await.unwrap();

    assert_eq!(second.alerts_sent, 0);
    assert_eq!(outbox.messages.lock().unwrap().len(), 1);
    assert_eq!(observation_names(&temp_dir).len(), 2);
}

#[test]
fn bundled_config_is_valid() {
    let cfg = Config::from_toml(include_str!("../Config.toml")).unwrap();
    assert_eq!(cfg.products.len(), 2);
    assert_eq!(cfg.products[1].policy, AlertPolicy::Threshold);
}
