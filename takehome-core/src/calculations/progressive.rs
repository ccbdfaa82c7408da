//! Progressive tax over a [`TaxBracketTable`].
//!
//! Two equivalent formulations are provided. [`progressive_tax`] walks the
//! table from the top bracket down, taxing each slice of the amount at its
//! own rate. [`quick_deduction_tax`] applies the marginal rate to the whole
//! amount and subtracts the bracket's quick deduction. For any table that
//! passes [`TaxBracketTable::new`] both give the same result to the cent.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use takehome_core::TaxBracketTable;
//! use takehome_core::calculations::{progressive_tax, quick_deduction_tax};
//!
//! let table = TaxBracketTable::annual();
//!
//! // 36000 × 3% + 4000 × 10%
//! assert_eq!(progressive_tax(dec!(40000), &table), dec!(1480.00));
//! assert_eq!(quick_deduction_tax(dec!(40000), &table), dec!(1480.00));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;
use crate::models::TaxBracketTable;

/// Tax on `amount`, summing each bracket slice from the highest threshold down.
pub fn progressive_tax(
    amount: Decimal,
    table: &TaxBracketTable,
) -> Decimal {
    let (tax, _) = table
        .brackets()
        .iter()
        .rev()
        .fold((Decimal::ZERO, amount), |(tax, remaining), bracket| {
            if remaining > bracket.threshold {
                (
                    tax + (remaining - bracket.threshold) * bracket.rate,
                    bracket.threshold,
                )
            } else {
                (tax, remaining)
            }
        });

    round_half_up(tax)
}

/// Tax on `amount` as `amount × rate − quick_deduction` for its marginal bracket.
pub fn quick_deduction_tax(
    amount: Decimal,
    table: &TaxBracketTable,
) -> Decimal {
    table
        .bracket_for(amount)
        .map(|bracket| round_half_up(amount * bracket.rate - bracket.quick_deduction))
        .unwrap_or(Decimal::ZERO)
}
