use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// A quantity of one token held in the tracked position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTokenPosition")]
pub struct TokenPosition {
    token_id: String,
    amount: f64,
}

/// Unvalidated wire form of [`TokenPosition`].
#[derive(Deserialize)]
struct RawTokenPosition {
    token_id: String,
    amount: f64,
}

impl TryFrom<RawTokenPosition> for TokenPosition {
    type Error = DomainError;

    fn try_from(raw: RawTokenPosition) -> Result<Self, Self::Error> {
        Self::new(raw.token_id, raw.amount)
    }
}

impl TokenPosition {
    /// Creates a position, rejecting amounts that are not strictly positive.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for an empty id or a zero,
    /// negative or non-finite amount.
    pub fn new(token_id: impl Into<String>, amount: f64) -> Result<Self, DomainError> {
        let token_id = token_id.into();
        if token_id.trim().is_empty() {
            return Err(DomainError::InvalidInput("token id cannot be empty".into()));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DomainError::InvalidInput(format!(
                "amount of {token_id} must be positive, got {amount}"
            )));
        }
        Ok(Self { token_id, amount })
    }

    pub fn token_id(&self) -> &str {
        &self.token_id
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}

/// The two token ids of the modeled pool, in price-feed identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    /// First token id.
    pub token1: String,
    /// Second token id.
    pub token2: String,
}

impl TokenPair {
    pub fn new(token1: impl Into<String>, token2: impl Into<String>) -> Self {
        Self {
            token1: token1.into(),
            token2: token2.into(),
        }
    }

    /// Ids to request from the feed, without repeating a token.
    pub fn ids(&self) -> Vec<String> {
        if self.token1 == self.token2 {
            vec![self.token1.clone()]
        } else {
            vec![self.token1.clone(), self.token2.clone()]
        }
    }
}
