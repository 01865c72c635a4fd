//! Display-only wallet connection.
//!
//! Calculations never depend on the wallet; the connected address is only
//! shown next to the tracked position.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Environment variable read by [`EnvWalletConnector`].
pub const WALLET_ENV_VAR: &str = "IL_TRACKER_WALLET";

/// Wallet connection errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// The wallet refused or returned something unusable.
    #[error("wallet connection rejected: {0}")]
    ConnectionRejected(String),
    /// No wallet is available.
    #[error("no wallet found, set IL_TRACKER_WALLET to an address")]
    NoWalletFound,
}

/// A checksummed-or-not EVM address, `0x` followed by 40 hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Validates an address string.
    ///
    /// # Errors
    /// Returns [`WalletError::ConnectionRejected`] when the format is wrong.
    pub fn parse(raw: &str) -> Result<Self, WalletError> {
        let raw = raw.trim();
        let valid = raw.len() == 42
            && (raw.starts_with("0x") || raw.starts_with("0X"))
            && raw[2..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(WalletError::ConnectionRejected(format!(
                "'{raw}' is not a wallet address"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// Shortened form, e.g. `0x1234...abcd`.
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = WalletError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the user's wallet identity.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Connects and returns the wallet address.
    async fn connect(&self) -> Result<WalletAddress, WalletError>;

    /// Forgets any cached connection.
    async fn disconnect(&self);
}

/// Connector taking the address from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvWalletConnector {
    /// Variable name.
    var: String,
}

impl EnvWalletConnector {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    fn resolve(raw: Option<String>) -> Result<WalletAddress, WalletError> {
        match raw {
            Some(value) if !value.trim().is_empty() => WalletAddress::parse(&value),
            _ => Err(WalletError::NoWalletFound),
        }
    }
}

impl Default for EnvWalletConnector {
    fn default() -> Self {
        Self::new(WALLET_ENV_VAR)
    }
}

#[async_trait]
impl WalletConnector for EnvWalletConnector {
    async fn connect(&self) -> Result<WalletAddress, WalletError> {
        Self::resolve(env::var(&self.var).ok())
    }

    async fn disconnect(&self) {}
}

/// Holds the connected wallet for display.
pub struct WalletSession {
    /// Connector.
    connector: Arc<dyn WalletConnector>,
    /// Connected address.
    address: Option<WalletAddress>,
}

impl WalletSession {
    pub fn new(connector: Arc<dyn WalletConnector>) -> Self {
        Self {
            connector,
            address: None,
        }
    }

    /// Connects, replacing any previous address.
    ///
    /// # Errors
    /// Propagates the connector error; the session stays disconnected.
    pub async fn connect(&mut self) -> Result<&WalletAddress, WalletError> {
        let address = self.connector.connect().await?;
        info!(wallet = %address.short(), "Wallet connected");
        Ok(self.address.insert(address))
    }

    pub async fn disconnect(&mut self) {
        if self.address.take().is_some() {
            self.connector.disconnect().await;
            info!("Wallet disconnected");
        }
    }

    pub fn address(&self) -> Option<&WalletAddress> {
        self.address.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

    #[test]
    fn test_parse_and_shorten() {
        let address = WalletAddress::parse(ADDRESS).unwrap();
        assert_eq!(address.short(), "0x5290...9EE7");

        assert!(matches!(
            WalletAddress::parse("0x1234"),
            Err(WalletError::ConnectionRejected(_))
        ));
        assert!(WalletAddress::parse("52908400098527886E0F7030069857D2E4169EE7aa").is_err());
        assert!(WalletAddress::parse("0xZZ908400098527886E0F7030069857D2E4169EE7").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let address: WalletAddress = serde_json::from_str(&format!("\"{ADDRESS}\"")).unwrap();
        assert_eq!(address.short(), "0x5290...9EE7");
        assert_eq!(serde_json::to_string(&address).unwrap(), format!("\"{ADDRESS}\""));

        assert!(serde_json::from_str::<WalletAddress>("\"0x12\"").is_err());
    }

    #[test]
    fn test_resolve_env_value() {
        assert_eq!(
            EnvWalletConnector::resolve(None),
            Err(WalletError::NoWalletFound)
        );
        assert_eq!(
            EnvWalletConnector::resolve(Some("  ".into())),
            Err(WalletError::NoWalletFound)
        );
        assert!(EnvWalletConnector::resolve(Some(ADDRESS.into())).is_ok());
    }

    struct Fixed(Result<WalletAddress, WalletError>);

    #[async_trait]
    impl WalletConnector for Fixed {
        async fn connect(&self) -> Result<WalletAddress, WalletError> {
            self.0.clone()
        }

        async fn disconnect(&self) {}
    }

    #[tokio::test]
    async fn test_session_connect_disconnect() {
        let address = WalletAddress::parse(ADDRESS).unwrap();
        let mut session = WalletSession::new(Arc::new(Fixed(Ok(address.clone()))));

        assert_eq!(session.connect().await.unwrap(), &address);
        assert_eq!(session.address(), Some(&address));

        session.disconnect().await;
        assert!(session.address().is_none());
    }

    #[tokio::test]
    async fn test_session_connect_failure() {
        let mut session = WalletSession::new(Arc::new(Fixed(Err(WalletError::NoWalletFound))));
        assert_eq!(session.connect().await, Err(WalletError::NoWalletFound));
        assert!(session.address().is_none());
    }
}
