use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::shared::types::{AlertPolicy, Product};

pub const DEFAULT_CONFIG_PATH: &str = "Config.toml";

/// Upper bound for a single inter-product pause
pub const MAX_DELAY_SECS: f64 = 3600.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageCfg {
    pub base_dir: PathBuf,
    pub observation_log: String,
    pub price_history: String,
}

impl Default for StorageCfg {
    fn default() -> Self {
        Self {
            base_dir: env::temp_dir(),
            observation_log: "AmazonProductsPriceDataset.csv".to_string(),
            price_history: "AmazonLastPrices.csv".to_string(),
        }
    }
}

impl StorageCfg {
    pub fn observation_log_path(&self) -> PathBuf {
        self.base_dir.join(&self.observation_log)
    }

    pub fn price_history_path(&self) -> PathBuf {
        self.base_dir.join(&self.price_history)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchCfg {
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub user_agents: Vec<String>,
    pub accept_language: String,
}

impl Default for FetchCfg {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
            read_timeout_secs: 15,
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)".to_string(),
            ],
            accept_language: "es-MX,es;q=0.9".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingCfg {
    pub min_delay_secs: f64,
    pub max_delay_secs: f64,
}

impl Default for PacingCfg {
    fn default() -> Self {
        Self { min_delay_secs: 5.0, max_delay_secs: 10.0 }
    }
}

impl PacingCfg {
    pub fn none() -> Self {
        Self { min_delay_secs: 0.0, max_delay_secs: 0.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyCfg {
    pub currency: String,
    pub channel_prefix: String,
}

impl Default for NotifyCfg {
    fn default() -> Self {
        Self {
            currency: "MXN".to_string(),
            channel_prefix: "whatsapp:".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageCfg,
    #[serde(default)]
    pub fetch: FetchCfg,
    #[serde(default)]
    pub pacing: PacingCfg,
    #[serde(default)]
    pub notify: NotifyCfg,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        Self::from_toml(&s).with_context(|| format!("parse {}", path.display()))
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.products.is_empty() {
            bail!("no [[products]] configured");
        }

        let mut names = HashSet::new();
        for product in &self.products {
            if product.name.trim().is_empty() {
                bail!("product with url {} has an empty name", product.url);
            }
            if !names.insert(product.name.as_str()) {
                bail!("duplicate product name: {}", product.name);
            }
            reqwest::Url::parse(&product.url)
                .with_context(|| format!("invalid url for product {}", product.name))?;
            if product.policy == AlertPolicy::Threshold && product.threshold.is_none() {
                bail!("product {} uses the threshold policy but has no threshold", product.name);
            }
        }

        let (min, max) = (self.pacing.min_delay_secs, self.pacing.max_delay_secs);
        if !min.is_finite() || !max.is_finite() {
            bail!("invalid pacing: delays must be finite, got {} and {}", min, max);
        }
        if min < 0.0 || min > max || max > MAX_DELAY_SECS {
            bail!(
                "invalid pacing: need 0 <= min_delay_secs ({}) <= max_delay_secs ({}) <= {}",
                min,
                max,
                MAX_DELAY_SECS
            );
        }
        if self.fetch.user_agents.is_empty() {
            bail!("fetch.user_agents must not be empty");
        }
        Ok(())
    }
}
