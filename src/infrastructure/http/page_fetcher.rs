use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::FetchCfg;
use crate::shared::errors::FetchError;

/// Source of raw product page markup
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page body. Non-success statuses are errors.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP fetcher with a rotating desktop user agent
pub struct HttpPageFetcher {
    http_client: Client,
    user_agents: Vec<String>,
    accept_language: String,
}

impl HttpPageFetcher {
    pub fn new(cfg: &FetchCfg) -> Result<Self, FetchError> {
        // reqwest 0.11 has no separate read timeout; budget the whole request.
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.connect_timeout_secs + cfg.read_timeout_secs))
            .build()
            .map_err(|e| FetchError::Setup(e.to_string()))?;

        Ok(Self {
            http_client,
            user_agents: cfg.user_agents.clone(),
            accept_language: cfg.accept_language.clone(),
        })
    }

    fn pick_user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or("Mozilla/5.0")
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let user_agent = sanitize_header(self.pick_user_agent());
        debug!("GET {} as {:?}", url, user_agent);

        let response = self
            .http_client
            .get(url)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT_LANGUAGE, self.accept_language.as_str())
            .send()
            .await
            .map_err(|source| FetchError::Transport { url: url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Body { url: url.to_string(), reason: e.to_string() })
    }
}

/// Header values must be visible ASCII; drop anything else
fn sanitize_header(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii() && !c.is_ascii_control()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_header_drops_non_ascii() {
        assert_eq!(sanitize_header("Mozilla/5.0 (X11; Línux)"), "Mozilla/5.0 (X11; Lnux)");
        assert_eq!(sanitize_header("ok\r\n"), "ok");
    }

    #[test]
    fn test_user_agent_from_config() {
        let cfg = FetchCfg { user_agents: vec!["agent-a".to_string()], ..FetchCfg::default() };
        let fetcher = HttpPageFetcher::new(&cfg).unwrap();
        assert_eq!(fetcher.pick_user_agent(), "agent-a");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let cfg = FetchCfg { connect_timeout_secs: 1, read_timeout_secs: 1, ..FetchCfg::default() };
        let fetcher = HttpPageFetcher::new(&cfg).unwrap();
        let err = fetcher.fetch("http://127.0.0.1:9/product").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
