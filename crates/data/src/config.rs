use std::env;
use std::time::Duration;

/// Default public CoinGecko endpoint.
pub const DEFAULT_COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Configuration for the HTTP price feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFeedConfig {
    /// Base URL without trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Quote currency.
    pub vs_currency: String,
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_COINGECKO_API_URL.to_string(),
            timeout: Duration::from_secs(10),
            vs_currency: "usd".to_string(),
        }
    }
}

impl PriceFeedConfig {
    /// Reads `COINGECKO_API_URL` and `COINGECKO_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("COINGECKO_API_URL")
            && !url.trim().is_empty()
        {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(secs) = env::var("COINGECKO_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|s| *s > 0)
        {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}
