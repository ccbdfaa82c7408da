//! Separate taxation of a year-end bonus.
//!
//! The bonus is divided by twelve only to pick a bracket from the monthly
//! table; the chosen rate and quick deduction then apply to the whole bonus.
//! The quick deduction is subtracted once, not twelve times, so the result
//! jumps at each bracket boundary: 36000 pays 1080.00 while 36001 pays
//! 3390.10.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::round_half_up;
use crate::models::{BonusTaxResult, TaxBracketTable};

const MONTHS_PER_BONUS: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Taxes a bonus through the monthly-equivalent table.
#[derive(Debug, Clone, Copy)]
pub struct BonusTaxCalculator<'a> {
    monthly: &'a TaxBracketTable,
}

impl<'a> BonusTaxCalculator<'a> {
    pub fn new(monthly: &'a TaxBracketTable) -> Self {
        Self { monthly }
    }

    /// Tax and after-tax amount for `bonus` taxed on its own.
    ///
    /// A zero or negative bonus yields an all-zero result.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use takehome_core::TaxBracketTable;
    /// use takehome_core::calculations::BonusTaxCalculator;
    ///
    /// let table = TaxBracketTable::monthly_bonus();
    /// let result = BonusTaxCalculator::new(&table).separate_bonus_tax(dec!(60000));
    ///
    /// assert_eq!(result.tax, dec!(5790.00));
    /// assert_eq!(result.after_tax, dec!(54210.00));
    /// assert_eq!(result.rate_pct, dec!(10));
    /// ```
    pub fn separate_bonus_tax(
        &self,
        bonus: Decimal,
    ) -> BonusTaxResult {
        if bonus <= Decimal::ZERO {
            return BonusTaxResult::default();
        }

        let monthly_equivalent = bonus / MONTHS_PER_BONUS;
        let tax = self
            .monthly
            .bracket_for(monthly_equivalent)
            .map(|b| round_half_up(bonus * b.rate - b.quick_deduction))
            .unwrap_or(Decimal::ZERO);
        let marginal = self.monthly.marginal(monthly_equivalent);
        let after_tax = round_half_up(bonus - tax);

        debug!(bonus = %bonus, tax = %tax, rate_pct = %marginal.rate_pct, "computed separate bonus tax");

        BonusTaxResult {
            tax,
            after_tax,
            rate_pct: marginal.rate_pct,
            quick_deduction: marginal.quick_deduction,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn tax(bonus: Decimal) -> BonusTaxResult {
        let table = TaxBracketTable::monthly_bonus();
        BonusTaxCalculator::new(&table).separate_bonus_tax(bonus)
    }

    // =========================================================================
    // separate_bonus_tax tests
    // =========================================================================

    #[test]
    fn zero_and_negative_bonus_are_all_zero() {
        assert_eq!(tax(dec!(0)), BonusTaxResult::default());
        assert_eq!(tax(dec!(-100)), BonusTaxResult::default());
    }

    #[test]
    fn bonus_in_second_bracket() {
        assert_eq!(
            tax(dec!(60000)),
            BonusTaxResult {
                tax: dec!(5790.00),
                after_tax: dec!(54210.00),
                rate_pct: dec!(10),
                quick_deduction: dec!(210),
            }
        );
    }

    #[test]
    fn bonus_at_first_boundary_stays_in_first_bracket() {
        let result = tax(dec!(36000));

        assert_eq!(result.tax, dec!(1080.00));
        assert_eq!(result.after_tax, dec!(34920.00));
        assert_eq!(result.rate_pct, dec!(3));
    }

    #[test]
    fn bonus_just_above_boundary_jumps_bracket() {
        let result = tax(dec!(36001));

        // 36001 × 10% − 210
        assert_eq!(result.tax, dec!(3390.10));
        assert_eq!(result.after_tax, dec!(32610.90));
        assert_eq!(result.rate_pct, dec!(10));
    }

    #[test]
    fn bonus_in_top_bracket() {
        let result = tax(dec!(1000000));

        // 1000000 × 45% − 15160
        assert_eq!(result.tax, dec!(434840.00));
        assert_eq!(result.rate_pct, dec!(45));
        assert_eq!(result.quick_deduction, dec!(15160));
    }

    #[test]
    fn small_bonus_rounds_to_cents() {
        // 333.33 × 3% = 9.9999
        assert_eq!(tax(dec!(333.33)).tax, dec!(10.00));
        assert_eq!(tax(dec!(333.33)).after_tax, dec!(323.33));
    }
}
