use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Ethereum,
    Bitcoin,
    Solana,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Ethereum, Network::Bitcoin, Network::Solana];

    /// Identifier used on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Network::Ethereum => "ethereum",
            Network::Bitcoin => "bitcoin",
            Network::Solana => "solana",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Network::Ethereum => "Ethereum",
            Network::Bitcoin => "Bitcoin",
            Network::Solana => "Solana",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Network {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|n| n.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::InvalidInput(format!("unknown network '{s}'")))
    }
}

/// How the polling cadence is currently chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingMode {
    /// Cadence follows the configured poll interval.
    Interval,
    /// Fixed one-minute cadence.
    Live,
}
