//! Terminal formatting helpers.

use il_tracker_domain::value_objects::PricePoint;
use rust_decimal::prelude::*;

/// Formats a USD amount as `$1,234.57`, or `N/A` when it cannot be represented.
pub fn usd(value: f64) -> String {
    let Some(amount) = Decimal::from_f64(value) else {
        return "N/A".to_string();
    };
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((&text, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{frac}")
}

/// Formats a loss fraction as a percentage with two decimals.
pub fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Formats a price point, `N/A` when the feed had nothing usable.
pub fn price(point: &PricePoint) -> String {
    point.usable().map_or_else(|| "N/A".to_string(), usd)
}
