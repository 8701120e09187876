//! Formatting utilities for metrics display.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format a percentage value (already in percent) with 2 decimal places.
#[must_use]
pub fn format_pct(value: Decimal) -> String {
    format!("{}%", format_decimal(value))
}

/// Format a decimal rounded half away from zero to 2 decimal places.
#[must_use]
pub fn format_decimal(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an account balance in dollars.
#[must_use]
pub fn format_money(value: Decimal) -> String {
    let rounded = round2(value);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_pct(dec!(66.666)), "66.67%");
        assert_eq!(format_decimal(dec!(123.456)), "123.46");
        assert_eq!(format_decimal(dec!(4)), "4.00");
        assert_eq!(format_decimal(dec!(0.125)), "0.13");
        assert_eq!(format_money(dec!(16.04)), "$16.04");
        assert_eq!(format_money(dec!(-3.5)), "-$3.50");
    }
}
