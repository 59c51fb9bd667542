//! Common utility functions for relief and deduction calculations.
//!
//! This module provides shared money helpers used by every calculator:
//! cent rounding and clamping at zero.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use proptax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(6252.505)), dec!(6252.51));
/// assert_eq!(round_half_up(dec!(6252.504)), dec!(6252.50));
/// assert_eq!(round_half_up(dec!(-10.005)), dec!(-10.01)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use proptax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(1750.00), dec!(6500.00)), dec!(6500.00));
/// assert_eq!(max(dec!(-100.00), dec!(0.00)), dec!(0.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps negative amounts to zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use proptax_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-12.50)), dec!(0));
/// assert_eq!(non_negative(dec!(12.50)), dec!(12.50));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}
