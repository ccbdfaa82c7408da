//! Cumulative withholding over a calendar year.
//!
//! Tax withheld in month `m` is the tax on year-to-date taxable income
//! through `m` minus the tax already withheld through `m − 1`. The engine
//! walks months 1 to 12 carrying that previous cumulative tax forward.
//!
//! A year-end bonus enters in one of two ways:
//!
//! - **Separate**: the bonus never touches cumulative income. Its after-tax
//!   amount (from [`BonusTaxCalculator`](super::BonusTaxCalculator)) is
//!   added to the payment month's take-home cash.
//! - **Combined**: the gross bonus joins cumulative income from its payment
//!   month onwards and is taxed through the annual table with the salary.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{max, round_half_up};
use crate::calculations::progressive::progressive_tax;
use crate::models::{BonusMonth, BonusTaxMode, MonthlyTaxRecord, TaxBracketTable};

/// Monthly basic deduction (起征点).
pub const BASIC_DEDUCTION: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// Months in the withholding year.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Per-month amounts the engine accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CumulativeTaxInput {
    pub monthly_salary: Decimal,
    /// Personal social insurance plus the employee housing fund.
    pub monthly_contributions: Decimal,
    pub special_deduction: Decimal,
    pub bonus: Decimal,
    pub bonus_month: BonusMonth,
    pub bonus_mode: BonusTaxMode,
    /// After-tax amount of a separately taxed bonus; ignored when combined.
    pub bonus_after_tax: Decimal,
    pub employee_fund: Decimal,
    pub employer_fund: Decimal,
}

/// Produces the twelve [`MonthlyTaxRecord`]s of one year.
#[derive(Debug, Clone, Copy)]
pub struct CumulativeTaxEngine<'a> {
    annual: &'a TaxBracketTable,
}

impl<'a> CumulativeTaxEngine<'a> {
    pub fn new(annual: &'a TaxBracketTable) -> Self {
        Self { annual }
    }

    /// Computes months 1 to 12 in order.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use takehome_core::TaxBracketTable;
    /// use takehome_core::calculations::{CumulativeTaxEngine, CumulativeTaxInput};
    ///
    /// let table = TaxBracketTable::annual();
    /// let input = CumulativeTaxInput {
    ///     monthly_salary: dec!(20000),
    ///     monthly_contributions: dec!(3500),
    ///     special_deduction: dec!(1500),
    ///     ..CumulativeTaxInput::default()
    /// };
    ///
    /// let months = CumulativeTaxEngine::new(&table).compute_twelve_months(&input);
    ///
    /// assert_eq!(months.len(), 12);
    /// assert_eq!(months[0].current_month_tax, dec!(300.00));
    /// assert_eq!(months[11].accumulated_tax, dec!(9480.00));
    /// ```
    pub fn compute_twelve_months(
        &self,
        input: &CumulativeTaxInput,
    ) -> Vec<MonthlyTaxRecord> {
        let months: Vec<MonthlyTaxRecord> = (1..=MONTHS_PER_YEAR)
            .scan(Decimal::ZERO, |previous_tax, month| {
                let record = self.month(input, month, *previous_tax);
                *previous_tax = record.accumulated_tax;
                Some(record)
            })
            .collect();

        debug!(
            mode = input.bonus_mode.as_str(),
            bonus_month = input.bonus_month.get(),
            annual_tax = %months.last().map(|m| m.accumulated_tax).unwrap_or_default(),
            "computed cumulative withholding"
        );

        months
    }

    fn month(
        &self,
        input: &CumulativeTaxInput,
        month: u32,
        previous_accumulated_tax: Decimal,
    ) -> MonthlyTaxRecord {
        let months = Decimal::from(month);
        let is_bonus_month = month == input.bonus_month.get();
        let combined = input.bonus_mode == BonusTaxMode::Combined;

        let mut accumulated_income = input.monthly_salary * months;
        if combined && month >= input.bonus_month.get() {
            accumulated_income += input.bonus;
        }

        let accumulated_contributions = input.monthly_contributions * months;
        let accumulated_basic_deduction = BASIC_DEDUCTION * months;
        let accumulated_special_deduction = input.special_deduction * months;

        // Brackets are looked up on the cent-rounded figure the record shows.
        let accumulated_taxable_income = round_half_up(max(
            Decimal::ZERO,
            accumulated_income
                - accumulated_contributions
                - accumulated_basic_deduction
                - accumulated_special_deduction,
        ));

        let accumulated_tax = progressive_tax(accumulated_taxable_income, self.annual);
        let current_month_tax = round_half_up(accumulated_tax - previous_accumulated_tax);
        let marginal = self.annual.marginal(accumulated_taxable_income);

        let (after_tax_income, bonus_after_tax) = match (is_bonus_month, input.bonus_mode) {
            (true, BonusTaxMode::Separate) => (
                round_half_up(
                    input.monthly_salary - input.monthly_contributions - current_month_tax
                        + input.bonus_after_tax,
                ),
                input.bonus_after_tax,
            ),
            (true, BonusTaxMode::Combined) => (
                round_half_up(
                    input.monthly_salary + input.bonus
                        - input.monthly_contributions
                        - current_month_tax,
                ),
                Decimal::ZERO,
            ),
            (false, _) => (
                round_half_up(
                    input.monthly_salary - input.monthly_contributions - current_month_tax,
                ),
                Decimal::ZERO,
            ),
        };

        MonthlyTaxRecord {
            month,
            accumulated_income,
            accumulated_contributions,
            accumulated_basic_deduction,
            accumulated_special_deduction,
            accumulated_taxable_income,
            accumulated_tax,
            previous_accumulated_tax,
            current_month_tax,
            after_tax_income,
            total_income_including_fund: round_half_up(
                after_tax_income + input.employee_fund + input.employer_fund,
            ),
            has_bonus: is_bonus_month && input.bonus > Decimal::ZERO,
            bonus_after_tax,
            marginal_rate_pct: marginal.rate_pct,
            quick_deduction: marginal.quick_deduction,
        }
    }
}
