use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use price_watch::app::{self, AppCfg};
use price_watch::config::{Config, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(version, about = "Track product listing prices and alert on changes")]
struct Args {
    /// Path to config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory for the observation log and price history (overrides config)
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Log alerts instead of sending them; no messaging credentials needed
    #[arg(long)]
    dry_run: bool,

    /// Repeat the run every N seconds instead of running once
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Exit with a non-zero status when any product or alert failed
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    // Priority: CLI args > Config file > Defaults
    let mut config = Config::from_file(&args.config)?;
    if let Some(base_dir) = args.base_dir {
        config.storage.base_dir = base_dir;
    }

    let mut app_cfg = AppCfg::from_config(config, args.dry_run);
    app_cfg.interval = args.interval_secs.filter(|s| *s > 0).map(Duration::from_secs);
    app_cfg.strict = args.strict;

    let strict = app_cfg.strict;
    let summary = app::run(app_cfg).await?;

    if strict && summary.has_failures() {
        warn!("Finished with failures: {}", summary);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
