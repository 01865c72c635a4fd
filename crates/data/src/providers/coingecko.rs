use crate::config::PriceFeedConfig;
use crate::error::PriceFeedError;
use crate::{PriceProvider, PriceQuotes};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Entry of the CoinGecko coin list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CoinListing {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

/// Price provider backed by the CoinGecko `simple/price` endpoint.
#[derive(Debug, Clone)]
pub struct CoinGeckoProvider {
    client: Client,
    config: PriceFeedConfig,
}

impl CoinGeckoProvider {
    /// Creates a provider with its own HTTP client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: PriceFeedConfig) -> Result<Self, PriceFeedError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn simple_price_url(&self, ids: &[String]) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies={}",
            self.config.base_url,
            ids.join(","),
            self.config.vs_currency
        )
    }

    /// Fetches the full list of coins known to the feed.
    ///
    /// # Errors
    /// Returns an error if the request fails or the body is not a coin list.
    pub async fn list_coins(&self) -> Result<Vec<CoinListing>, PriceFeedError> {
        let url = format!("{}/coins/list", self.config.base_url);
        let body = self.get_text(&url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_text(&self, url: &str) -> Result<String, PriceFeedError> {
        debug!(url = %url, "Requesting price feed");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Price feed returned error status");
            return Err(PriceFeedError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Body of `simple/price`: `{ "<id>": { "<currency>": <price> } }`.
type SimplePriceBody = HashMap<String, HashMap<String, Option<f64>>>;

/// Parses a `simple/price` body, keeping only ids with a numeric quote.
pub(crate) fn parse_simple_price(body: &str, vs_currency: &str) -> Result<PriceQuotes, PriceFeedError> {
    let parsed: SimplePriceBody = serde_json::from_str(body)?;
    Ok(parsed
        .into_iter()
        .filter_map(|(id, quotes)| {
            let price = quotes.get(vs_currency).copied().flatten()?;
            Some((id, price))
        })
        .collect())
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    async fn get_prices(&self, ids: &[String]) -> Result<PriceQuotes, PriceFeedError> {
        if ids.is_empty() {
            return Ok(PriceQuotes::new());
        }

        let url = self.simple_price_url(ids);
        let body = self.get_text(&url).await?;
        let quotes = parse_simple_price(&body, &self.config.vs_currency)?;

        debug!(requested = ids.len(), received = quotes.len(), "Fetched prices");
        Ok(quotes)
    }
}
