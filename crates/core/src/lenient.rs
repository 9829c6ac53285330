//! Forgiving numeric parsing for form input.
//!
//! Product prices and stock counts arrive as free-text form fields. The
//! admin panel contract is that unparseable input silently becomes zero
//! rather than failing the whole request.

use rust_decimal::Decimal;

/// Parse a price field, defaulting to zero.
///
/// Unparseable or negative input yields `Decimal::ZERO`. Prices are
/// non-negative by contract.
#[must_use]
pub fn price_or_zero(input: &str) -> Decimal {
    input
        .trim()
        .parse::<Decimal>()
        .ok()
        .filter(|price| !price.is_sign_negative())
        .unwrap_or_default()
}

/// Parse a stock count field, defaulting to zero.
#[must_use]
pub fn stock_or_zero(input: &str) -> u32 {
    input.trim().parse::<u32>().unwrap_or_default()
}
