//! Catalog of networks and the price-feed token ids offered for each.

use crate::entities::TokenPair;
use crate::enums::Network;

/// A token selectable for a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    /// Price-feed identifier.
    pub id: &'static str,
    pub name: &'static str,
}

const ETHEREUM_TOKENS: &[TokenInfo] = &[
    TokenInfo { id: "ethereum", name: "Ethereum (ETH)" },
    TokenInfo { id: "weth", name: "Wrapped Ether (WETH)" },
    TokenInfo { id: "usdt", name: "Tether (USDT)" },
    TokenInfo { id: "usdc", name: "USD Coin (USDC)" },
    TokenInfo { id: "dai", name: "Dai (DAI)" },
    TokenInfo { id: "uni", name: "Uniswap (UNI)" },
    TokenInfo { id: "link", name: "Chainlink (LINK)" },
];

const BITCOIN_TOKENS: &[TokenInfo] = &[
    TokenInfo { id: "bitcoin", name: "Bitcoin (BTC)" },
    TokenInfo { id: "wbtc", name: "Wrapped Bitcoin (WBTC)" },
];

const SOLANA_TOKENS: &[TokenInfo] = &[
    TokenInfo { id: "solana", name: "Solana (SOL)" },
    TokenInfo { id: "usdt", name: "Tether (USDT)" },
    TokenInfo { id: "usdc", name: "USD Coin (USDC)" },
    TokenInfo { id: "bonk", name: "Bonk (BONK)" },
];

/// Tokens offered for a network, in display order.
pub fn tokens(network: Network) -> &'static [TokenInfo] {
    match network {
        Network::Ethereum => ETHEREUM_TOKENS,
        Network::Bitcoin => BITCOIN_TOKENS,
        Network::Solana => SOLANA_TOKENS,
    }
}

/// First two tokens of the network, or the only token twice.
pub fn default_pair(network: Network) -> TokenPair {
    let list = tokens(network);
    let first = list[0].id;
    let second = list.get(1).map_or(first, |t| t.id);
    TokenPair::new(first, second)
}

/// Looks up a token offered on `network` by id.
pub fn find_token(network: Network, id: &str) -> Option<&'static TokenInfo> {
    tokens(network).iter().find(|t| t.id == id)
}
