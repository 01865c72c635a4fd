use thiserror::Error;

/// Errors raised when validating user-supplied values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// A value rejected at the input boundary.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Reasons an impermanent loss figure cannot be produced.
///
/// Every variant means "no sample this tick"; none is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalculationError {
    /// One or both prices are absent, zero, negative or not finite.
    #[error("price unavailable")]
    PriceUnavailable,
    /// One or both token amounts are not strictly positive.
    #[error("token amounts must be strictly positive")]
    NonPositiveAmount,
    /// An intermediate value overflowed or became NaN.
    #[error("calculation produced a non-finite value")]
    NonFiniteResult,
}
