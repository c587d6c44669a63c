use crate::error::{ClientError, Result};
use dotenv::var;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Read `MACROSCOPE_API_URL`, `MACROSCOPE_TIMEOUT_SECS` and `USER_AGENT`,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = var("MACROSCOPE_API_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(secs) = var("MACROSCOPE_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|e| {
                ClientError::Config(format!("MACROSCOPE_TIMEOUT_SECS={secs:?}: {e}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        config.user_agent = var("USER_AGENT").ok();

        url::Url::parse(&config.base_url)
            .map_err(|e| ClientError::Config(format!("MACROSCOPE_API_URL={:?}: {e}", config.base_url)))?;

        Ok(config)
    }
}

/// The "good enough, fast enough" knobs of the polling search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Shorter queries don't reach the backend.
    pub min_query_len: usize,
    pub limit: usize,
    pub poll_interval: Duration,
    /// Wall-clock budget, measured from the first poll.
    pub deadline: Duration,
    /// Stop once this many distinct results are in.
    pub enough_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            limit: 10,
            poll_interval: Duration::from_millis(100),
            deadline: Duration::from_millis(5000),
            enough_results: 3,
        }
    }
}
