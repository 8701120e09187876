//! Statistical math utilities for trade metric calculations.

use rust_decimal::Decimal;

use super::constants::{TOLERANCE, TWO};

/// `numerator / denominator`, or zero when the divisor is zero or the
/// quotient does not fit in a `Decimal`.
pub fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Calculate mean of a slice of decimals. `None` when empty or when the
/// sum overflows.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))?;
    sum.checked_div(Decimal::from(values.len() as u64))
}

/// Population standard deviation (divides by N). `None` for fewer than
/// two values or when the variance overflows.
pub fn population_std_dev(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }

    let avg = mean(values)?;
    let variance_sum = values.iter().try_fold(Decimal::ZERO, |acc, v| {
        let deviation = v.checked_sub(avg)?;
        acc.checked_add(deviation.checked_mul(deviation)?)
    })?;
    let variance = variance_sum.checked_div(Decimal::from(values.len() as u64))?;

    sqrt_decimal(variance)
}

/// Approximate square root using Newton's method.
pub fn sqrt_decimal(value: Decimal) -> Option<Decimal> {
    if value < Decimal::ZERO {
        return None;
    }
    if value == Decimal::ZERO {
        return Some(Decimal::ZERO);
    }

    let mut guess = if value > Decimal::ONE { value / TWO } else { Decimal::ONE };

    for _ in 0..100 {
        let next = (guess + value / guess) / TWO;
        if (next - guess).abs() < TOLERANCE {
            return Some(next);
        }
        guess = next;
    }

    Some(guess)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[dec!(10), dec!(20), dec!(30), dec!(40)]), Some(dec!(25)));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_population_std_dev() {
        // Population variance of 2,4,4,4,5,5,7,9 is exactly 4.
        let values = [2, 4, 4, 4, 5, 5, 7, 9].map(Decimal::from);
        let Some(std) = population_std_dev(&values) else {
            panic!("std dev should succeed for 8 values");
        };
        assert!((std - dec!(2)).abs() < dec!(0.0001));
    }

    #[test]
    fn std_dev_needs_two_values() {
        assert_eq!(population_std_dev(&[dec!(5)]), None);
    }

    #[test]
    fn std_dev_of_constant_series_is_zero() {
        let Some(std) = population_std_dev(&[dec!(1.5), dec!(1.5), dec!(1.5)]) else {
            panic!("std dev should succeed");
        };
        assert_eq!(std, Decimal::ZERO);
    }

    #[test]
    fn overflowing_inputs_yield_none() {
        let huge = [Decimal::MAX, Decimal::MAX];
        assert_eq!(mean(&huge), None);
        assert_eq!(population_std_dev(&[Decimal::MAX, Decimal::MIN]), None);
    }

    #[test]
    fn ratio_falls_back_to_zero() {
        assert_eq!(ratio(dec!(8), dec!(2)), dec!(4));
        assert_eq!(ratio(dec!(1), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(ratio(Decimal::MAX, dec!(0.0001)), Decimal::ZERO);
    }

    #[test]
    fn test_sqrt() {
        let Some(sqrt4) = sqrt_decimal(dec!(4)) else {
            panic!("sqrt of 4 should succeed");
        };
        assert!((sqrt4 - dec!(2)).abs() < dec!(0.001));

        let Some(sqrt_small) = sqrt_decimal(dec!(0.0004)) else {
            panic!("sqrt of 0.0004 should succeed");
        };
        assert!((sqrt_small - dec!(0.02)).abs() < dec!(0.000001));

        assert_eq!(sqrt_decimal(dec!(-1)), None);
    }
}
