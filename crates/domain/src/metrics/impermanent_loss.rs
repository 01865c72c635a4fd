use super::ImpermanentLoss;
use crate::error::CalculationError;
use crate::math::constant_product::{calculate_k, calculate_price_ratio, rebalanced_amounts};

/// Calculates impermanent loss for two held amounts at their current USD prices.
///
/// The pool is modeled as fee-less x * y = k with k taken from the supplied
/// amounts, rebalanced to the observed price ratio and compared against
/// holding the same amounts. No entry price is involved: the amounts are
/// assumed to sit on the pool's curve, which holds only when they were of
/// equal USD value when liquidity was provided. For such amounts the result
/// equals [`calculate_il_constant_product`]; for others it is a modeling
/// simplification, not a measured loss.
///
/// # Arguments
///
/// * `amount1`, `amount2` - Token quantities, strictly positive
/// * `price1`, `price2` - USD prices, `None` when the feed had no data
///
/// # Errors
///
/// * [`CalculationError::PriceUnavailable`] - a price is absent, zero or negative
/// * [`CalculationError::NonPositiveAmount`] - an amount is not strictly positive
/// * [`CalculationError::NonFiniteResult`] - an intermediate overflowed
pub fn calculate_il_rebalanced(
    amount1: f64,
    amount2: f64,
    price1: Option<f64>,
    price2: Option<f64>,
) -> Result<ImpermanentLoss, CalculationError> {
    let usable = |p: Option<f64>| p.filter(|p| p.is_finite() && *p > 0.0);
    let (Some(price1), Some(price2)) = (usable(price1), usable(price2)) else {
        return Err(CalculationError::PriceUnavailable);
    };
    if !(amount1.is_finite() && amount2.is_finite() && amount1 > 0.0 && amount2 > 0.0) {
        return Err(CalculationError::NonPositiveAmount);
    }

    let hold_value = amount1 * price1 + amount2 * price2;
    let k = calculate_k(amount1, amount2);
    let price_ratio = calculate_price_ratio(price1, price2)?;
    let (new_amount1, new_amount2) = rebalanced_amounts(k, price_ratio)?;
    let lp_value = new_amount1 * price1 + new_amount2 * price2;

    if !hold_value.is_finite() || hold_value <= 0.0 || !lp_value.is_finite() {
        return Err(CalculationError::NonFiniteResult);
    }

    let loss_fraction = lp_value / hold_value - 1.0;
    if !loss_fraction.is_finite() {
        return Err(CalculationError::NonFiniteResult);
    }

    Ok(ImpermanentLoss {
        hold_value,
        lp_value,
        k,
        price_ratio,
        new_amount1,
        new_amount2,
        loss_fraction,
    })
}

/// Calculates Impermanent Loss for a constant product pool from a price move.
/// formula: 2 * sqrt(price_ratio) / (1 + price_ratio) - 1
///
/// # Arguments
///
/// * `entry_price` - The price at which the position was opened (token1/token2)
/// * `current_price` - The current price (token1/token2)
///
/// # Returns
///
/// * `f64` - The impermanent loss as a negative fraction (e.g., -0.05 for 5% loss)
pub fn calculate_il_constant_product(
    entry_price: f64,
    current_price: f64,
) -> Result<f64, CalculationError> {
    if !(entry_price.is_finite() && entry_price > 0.0)
        || !(current_price.is_finite() && current_price > 0.0)
    {
        return Err(CalculationError::PriceUnavailable);
    }

    let price_ratio = current_price / entry_price;
    let result = 2.0 * price_ratio.sqrt() / (1.0 + price_ratio) - 1.0;

    if result.is_finite() {
        Ok(result)
    } else {
        Err(CalculationError::NonFiniteResult)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_inverted_price_isolates_ratio() {
        let il = calculate_il_rebalanced(1.0, 2000.0, Some(2000.0), Some(1.0)).unwrap();

        assert!((il.hold_value - 4000.0).abs() < EPS);
        assert!((il.k - 2000.0).abs() < EPS);
        assert!((il.price_ratio - 2000.0).abs() < EPS);
        assert!((il.new_amount1 - 1.0).abs() < EPS);
        assert!((il.new_amount2 - 2000.0).abs() < EPS);
        assert!((il.lp_value - 4000.0).abs() < EPS);
        assert!(il.loss_fraction.abs() < EPS);
    }

    #[test]
    fn test_four_x_price_move() {
        // Start: 1 and 1 at $1 each
        let start = calculate_il_rebalanced(1.0, 1.0, Some(1.0), Some(1.0)).unwrap();
        assert!((start.hold_value - 2.0).abs() < EPS);
        assert!((start.lp_value - 2.0).abs() < EPS);
        assert!(start.loss_fraction.abs() < EPS);

        // Token1 goes to $4: textbook 20% loss
        let moved = calculate_il_rebalanced(1.0, 1.0, Some(4.0), Some(1.0)).unwrap();
        assert!((moved.price_ratio - 4.0).abs() < EPS);
        assert!((moved.new_amount1 - 0.5).abs() < EPS);
        assert!((moved.new_amount2 - 2.0).abs() < EPS);
        assert!((moved.lp_value - 4.0).abs() < EPS);
        assert!((moved.hold_value - 5.0).abs() < EPS);
        assert!((moved.loss_fraction + 0.2).abs() < EPS);
        assert!((moved.absolute_loss_usd() + 1.0).abs() < EPS);
    }

    #[test]
    fn test_unavailable_inputs() {
        let cases = [
            (1.0, 1.0, None, Some(1.0), CalculationError::PriceUnavailable),
            (1.0, 1.0, Some(1.0), None, CalculationError::PriceUnavailable),
            (1.0, 1.0, Some(0.0), Some(1.0), CalculationError::PriceUnavailable),
            (1.0, 1.0, Some(1.0), Some(0.0), CalculationError::PriceUnavailable),
            (1.0, 1.0, Some(f64::NAN), Some(1.0), CalculationError::PriceUnavailable),
            (0.0, 1.0, Some(1.0), Some(1.0), CalculationError::NonPositiveAmount),
            (1.0, -2.0, Some(1.0), Some(1.0), CalculationError::NonPositiveAmount),
        ];

        for (a1, a2, p1, p2, expected) in cases {
            assert_eq!(calculate_il_rebalanced(a1, a2, p1, p2), Err(expected));
        }
    }

    #[test]
    fn test_overflow_is_not_returned() {
        let result = calculate_il_rebalanced(f64::MAX, f64::MAX, Some(f64::MAX), Some(1.0));
        assert_eq!(result, Err(CalculationError::NonFiniteResult));
    }

    // Zero loss at equal prices needs equal amounts: with a1 != a2 the pool
    // rebalances to sqrt(a1*a2) of each, which is below the holding value.
    #[test]
    fn test_equal_prices_no_loss() {
        let mut rng = rand::rng();
        for _ in 0..500 {
            let a1 = rng.random_range(0.001..10_000.0);
            let a2 = rng.random_range(0.001..10_000.0);
            let p = rng.random_range(0.0001..100_000.0);

            let il = calculate_il_rebalanced(a1, a1, Some(p), Some(p)).unwrap();
            assert!(il.loss_fraction.abs() < 1e-9, "a={a1} p={p}");

            // Unequal amounts still settle on k
            let il = calculate_il_rebalanced(a1, a2, Some(p), Some(p)).unwrap();
            assert!((il.new_amount1 * il.new_amount2 - il.k).abs() / il.k < 1e-9);
        }
    }

    #[test]
    fn test_lp_never_above_hold() {
        let mut rng = rand::rng();
        for _ in 0..1_000 {
            let a1 = rng.random_range(0.001..10_000.0);
            let a2 = rng.random_range(0.001..10_000.0);
            let p1 = rng.random_range(0.0001..100_000.0);
            let p2 = rng.random_range(0.0001..100_000.0);

            let il = calculate_il_rebalanced(a1, a2, Some(p1), Some(p2)).unwrap();
            let tolerance = il.hold_value * 1e-12;
            assert!(
                il.lp_value <= il.hold_value + tolerance,
                "a1={a1} a2={a2} p1={p1} p2={p2}"
            );
            assert!(il.loss_fraction <= 1e-12);
            assert!(il.loss_fraction.is_finite());
        }
    }

    #[test]
    fn test_matches_closed_form_when_balanced_at_entry() {
        // Amounts worth the same at entry (1 * 100 == 100 * 1), then token1 doubles.
        let il = calculate_il_rebalanced(1.0, 100.0, Some(200.0), Some(1.0)).unwrap();
        let closed_form = calculate_il_constant_product(100.0, 200.0).unwrap();
        assert!((il.loss_fraction - closed_form).abs() < 1e-12);

        let mut rng = rand::rng();
        for _ in 0..200 {
            let entry = rng.random_range(0.01..10_000.0);
            let current = rng.random_range(0.01..10_000.0);
            let a1 = rng.random_range(0.01..100.0);

            let il = calculate_il_rebalanced(a1, a1 * entry, Some(current), Some(1.0)).unwrap();
            let closed_form = calculate_il_constant_product(entry, current).unwrap();
            assert!((il.loss_fraction - closed_form).abs() < 1e-9);
        }
    }

    #[test]
    fn test_calculate_il_constant_product() {
        // Price doubles: 100 -> 200. Ratio = 2.
        // IL = 2*sqrt(2)/(1+2) - 1 = 2*1.4142/3 - 1 = 0.9428 - 1 = -0.0572 (5.72%)
        let il = calculate_il_constant_product(100.0, 200.0).unwrap();
        assert!((il - -0.05719).abs() < 0.0001);

        // 4x move is the textbook 20%
        let il = calculate_il_constant_product(1.0, 4.0).unwrap();
        assert!((il + 0.2).abs() < 1e-12);

        assert!(calculate_il_constant_product(0.0, 1.0).is_err());
    }
}
