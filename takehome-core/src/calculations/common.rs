//! Shared numeric helpers: cent rounding and base clamping.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use takehome_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Raises `base` to `min` or lowers it to `max` when it falls outside the bounds.
///
/// Evaluated as `max(min, min(max, base))`, so an inverted range resolves to `min`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use takehome_core::calculations::common::clamp_base;
///
/// assert_eq!(clamp_base(dec!(5000), dec!(7460), dec!(37302)), dec!(7460));
/// assert_eq!(clamp_base(dec!(20000), dec!(7460), dec!(37302)), dec!(20000));
/// assert_eq!(clamp_base(dec!(50000), dec!(7460), dec!(37302)), dec!(37302));
/// ```
pub fn clamp_base(
    base: Decimal,
    min: Decimal,
    max_bound: Decimal,
) -> Decimal {
    max(min, base.min(max_bound))
}
