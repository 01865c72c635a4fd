use crate::error::CalculationError;

/// Calculates the constant product K = x * y.
pub fn calculate_k(amount1: f64, amount2: f64) -> f64 {
    amount1 * amount2
}

/// Calculates the spot price of token1 in units of token2 from USD prices.
pub fn calculate_price_ratio(price1: f64, price2: f64) -> Result<f64, CalculationError> {
    if price2 <= 0.0 || !price2.is_finite() {
        return Err(CalculationError::PriceUnavailable);
    }
    let ratio = price1 / price2;
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(CalculationError::NonFiniteResult);
    }
    Ok(ratio)
}

/// Returns the reserves a fee-less x * y = k pool settles at for a price ratio.
///
/// formula: x = sqrt(k / ratio), y = k / x
pub fn rebalanced_amounts(k: f64, price_ratio: f64) -> Result<(f64, f64), CalculationError> {
    if k <= 0.0 || price_ratio <= 0.0 {
        return Err(CalculationError::NonPositiveAmount);
    }

    let amount1 = (k / price_ratio).sqrt();
    let amount2 = k / amount1;

    if !amount1.is_finite() || !amount2.is_finite() || amount1 <= 0.0 {
        return Err(CalculationError::NonFiniteResult);
    }
    Ok((amount1, amount2))
}
