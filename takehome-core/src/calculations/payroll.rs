//! End-to-end take-home pay calculation.
//!
//! [`PayrollCalculator`] wires the individual calculators together in the
//! order they depend on each other:
//!
//! 1. Social insurance and housing fund from the city parameters
//! 2. Separate bonus tax (skipped when the bonus is combined with salary)
//! 3. Twelve months of cumulative withholding
//! 4. The annual summary

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::annual::{AnnualAggregator, AnnualSummaryInput};
use crate::calculations::bonus::BonusTaxCalculator;
use crate::calculations::contributions::ContributionCalculator;
use crate::calculations::cumulative::{CumulativeTaxEngine, CumulativeTaxInput};
use crate::models::{
    BonusTaxMode, BonusTaxResult, CityParameters, PayrollInput, PayrollReport, TaxTables,
};

/// A bonus of `months` times the monthly salary, truncated to whole yuan.
///
/// Returns 0 when the salary is not positive.
///
/// ```
/// use rust_decimal_macros::dec;
/// use takehome_core::calculations::quick_bonus;
///
/// assert_eq!(quick_bonus(dec!(12345.67), 2), dec!(24691));
/// assert_eq!(quick_bonus(dec!(0), 3), dec!(0));
/// ```
pub fn quick_bonus(
    monthly_salary: Decimal,
    months: u32,
) -> Decimal {
    if monthly_salary <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    monthly_salary
        .checked_mul(Decimal::from(months))
        .unwrap_or_else(|| {
            warn!(salary = %monthly_salary, months, "bonus overflows; using the largest amount");
            Decimal::MAX
        })
        .floor()
}

/// Runs a complete calculation against a fixed pair of rate tables.
#[derive(Debug, Clone, Default)]
pub struct PayrollCalculator {
    tables: TaxTables,
}

impl PayrollCalculator {
    pub fn new(tables: TaxTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &TaxTables {
        &self.tables
    }

    /// Calculates the full year for `input` under `city`.
    ///
    /// The input is sanitized first; the calculation itself cannot fail.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use takehome_core::calculations::PayrollCalculator;
    /// use takehome_core::{CityParameters, PayrollInput};
    ///
    /// let input = PayrollInput {
    ///     monthly_salary: dec!(20000),
    ///     special_deduction: dec!(1500),
    ///     ..PayrollInput::default()
    /// };
    ///
    /// let report = PayrollCalculator::default().calculate(&input, &CityParameters::default());
    ///
    /// assert_eq!(report.social.total, dec!(2100.00));
    /// assert_eq!(report.annual.total_tax, dec!(9480.00));
    /// ```
    pub fn calculate(
        &self,
        input: &PayrollInput,
        city: &CityParameters,
    ) -> PayrollReport {
        let input = input.sanitized();

        let contributions = ContributionCalculator::new(city);
        let social = contributions.social_insurance(input.effective_social_base());
        let fund_base = input.effective_fund_base();
        let employee_fund =
            contributions.housing_fund(fund_base, input.effective_employee_fund_ratio());
        let employer_fund =
            contributions.housing_fund(fund_base, input.effective_employer_fund_ratio());

        let bonus = match input.bonus_mode {
            BonusTaxMode::Separate => BonusTaxCalculator::new(&self.tables.monthly_bonus)
                .separate_bonus_tax(input.year_bonus),
            BonusTaxMode::Combined => BonusTaxResult::untaxed(input.year_bonus),
        };

        let months =
            CumulativeTaxEngine::new(&self.tables.annual).compute_twelve_months(&CumulativeTaxInput {
                monthly_salary: input.monthly_salary,
                monthly_contributions: social.total + employee_fund,
                special_deduction: input.special_deduction,
                bonus: input.year_bonus,
                bonus_month: input.bonus_month,
                bonus_mode: input.bonus_mode,
                bonus_after_tax: bonus.after_tax,
                employee_fund,
                employer_fund,
            });

        let annual = AnnualAggregator::new(&self.tables.annual).summarize(
            &AnnualSummaryInput {
                monthly_salary: input.monthly_salary,
                monthly_social: social.total,
                employee_fund,
                employer_fund,
                special_deduction: input.special_deduction,
                bonus: input.year_bonus,
                separate_bonus_tax: bonus.tax,
            },
            &months,
        );

        debug!(
            salary = %input.monthly_salary,
            total_tax = %annual.total_tax,
            after_tax = %annual.after_tax,
            "calculated payroll"
        );

        PayrollReport {
            city: *city,
            social,
            employee_fund,
            employer_fund,
            bonus_mode: input.bonus_mode,
            bonus_month: input.bonus_month,
            bonus,
            months,
            annual,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{BonusMonth, MAX_AMOUNT};

    fn input(
        bonus: Decimal,
        mode: BonusTaxMode,
    ) -> PayrollInput {
        PayrollInput {
            monthly_salary: dec!(20000),
            special_deduction: dec!(1500),
            year_bonus: bonus,
            bonus_mode: mode,
            ..PayrollInput::default()
        }
    }

    // =========================================================================
    // quick_bonus tests
    // =========================================================================

    #[test]
    fn quick_bonus_multiplies_and_truncates() {
        assert_eq!(quick_bonus(dec!(20000), 3), dec!(60000));
        assert_eq!(quick_bonus(dec!(8888.88), 1), dec!(8888));
    }

    #[test]
    fn quick_bonus_saturates_instead_of_overflowing() {
        assert_eq!(quick_bonus(Decimal::MAX, 12), Decimal::MAX);
    }

    #[test]
    fn calculate_huge_salary_in_custom_city_is_capped() {
        let city = CityParameters::unconstrained(dec!(0.08), dec!(0.02), dec!(0.005));
        let input = PayrollInput {
            monthly_salary: Decimal::MAX,
            year_bonus: Decimal::MAX,
            ..PayrollInput::default()
        };

        let report = PayrollCalculator::default().calculate(&input, &city);

        assert_eq!(report.social.base, MAX_AMOUNT);
        assert_eq!(report.annual.pre_tax, MAX_AMOUNT * dec!(13));
    }

    #[test]
    fn quick_bonus_non_positive_salary_is_zero() {
        assert_eq!(quick_bonus(dec!(-1), 2), dec!(0));
        assert_eq!(quick_bonus(dec!(0), 2), dec!(0));
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_defaults_bases_to_salary() {
        let report = PayrollCalculator::default()
            .calculate(&input(dec!(0), BonusTaxMode::Separate), &CityParameters::default());

        assert_eq!(report.social.base, dec!(20000));
        assert_eq!(report.employee_fund, dec!(1400.00));
        assert_eq!(report.employer_fund, dec!(1400.00));
        assert_eq!(report.months.len(), 12);
    }

    #[test]
    fn calculate_separate_bonus() {
        let report = PayrollCalculator::default()
            .calculate(&input(dec!(60000), BonusTaxMode::Separate), &CityParameters::default());

        assert_eq!(report.bonus.tax, dec!(5790.00));
        assert_eq!(report.months[11].after_tax_income, dec!(69710.00));
        assert_eq!(report.annual.total_tax, dec!(15270.00));
        assert_eq!(report.annual.after_tax, dec!(242730.00));
    }

    #[test]
    fn calculate_combined_bonus_reports_untaxed_bonus() {
        let report = PayrollCalculator::default()
            .calculate(&input(dec!(60000), BonusTaxMode::Combined), &CityParameters::default());

        assert_eq!(report.bonus, BonusTaxResult::untaxed(dec!(60000)));
        assert_eq!(report.annual.bonus_tax, dec!(0));
        assert_eq!(report.annual.total_tax, dec!(19080.00));
        assert_eq!(report.months[11].after_tax_income, dec!(65900.00));
    }

    #[test]
    fn calculate_honours_explicit_zero_fund_ratio() {
        let report = PayrollCalculator::default().calculate(
            &PayrollInput {
                employee_fund_ratio: Some(dec!(0)),
                ..input(dec!(0), BonusTaxMode::Separate)
            },
            &CityParameters::default(),
        );

        assert_eq!(report.employee_fund, dec!(0));
        assert_eq!(report.employer_fund, dec!(1400.00));
    }

    #[test]
    fn calculate_sanitizes_negative_input() {
        let report = PayrollCalculator::default().calculate(
            &PayrollInput {
                year_bonus: dec!(-5000),
                bonus_month: BonusMonth::new(6),
                ..input(dec!(0), BonusTaxMode::Separate)
            },
            &CityParameters::default(),
        );

        assert_eq!(report.bonus, BonusTaxResult::default());
        assert_eq!(report.annual.pre_tax, dec!(240000.00));
    }

    #[test]
    fn calculate_keeps_city_snapshot() {
        let city = CityParameters::unconstrained(dec!(0.08), dec!(0.02), dec!(0.005));
        let report =
            PayrollCalculator::default().calculate(&input(dec!(0), BonusTaxMode::Separate), &city);

        assert_eq!(report.city, city);
    }

    proptest! {
        #[test]
        fn prop_combined_bonus_never_adds_bonus_tax(
            salary in 0i64..10_000_000,
            bonus in 0i64..100_000_000
        ) {
            let report = PayrollCalculator::default().calculate(
                &PayrollInput {
                    monthly_salary: Decimal::new(salary, 2),
                    year_bonus: Decimal::new(bonus, 2),
                    bonus_mode: BonusTaxMode::Combined,
                    ..PayrollInput::default()
                },
                &CityParameters::default(),
            );

            prop_assert_eq!(report.annual.bonus_tax, Decimal::ZERO);
            prop_assert_eq!(report.annual.total_tax, report.annual.salary_tax);
        }
    }
}
