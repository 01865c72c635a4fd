use thiserror::Error;

/// Failure to obtain quotes from the price feed.
#[derive(Debug, Error)]
pub enum PriceFeedError {
    /// The HTTP request could not be completed.
    #[error("price feed request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The feed answered with a non-success status.
    #[error("price feed returned status {status}")]
    Status { status: u16 },
    /// The body was not the expected JSON.
    #[error("price feed response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}
