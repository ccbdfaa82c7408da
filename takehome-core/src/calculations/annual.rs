//! Year totals from the twelve monthly records.

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;
use crate::calculations::cumulative::MONTHS_PER_YEAR;
use crate::models::{AnnualSummary, MonthlyTaxRecord, TaxBracketTable};

/// Monthly amounts the aggregator scales to a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnnualSummaryInput {
    pub monthly_salary: Decimal,
    /// Personal social insurance only; the employee fund is separate.
    pub monthly_social: Decimal,
    pub employee_fund: Decimal,
    pub employer_fund: Decimal,
    pub special_deduction: Decimal,
    pub bonus: Decimal,
    /// Separate bonus tax, or 0 when the bonus was combined with salary.
    pub separate_bonus_tax: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct AnnualAggregator<'a> {
    annual: &'a TaxBracketTable,
}

impl<'a> AnnualAggregator<'a> {
    pub fn new(annual: &'a TaxBracketTable) -> Self {
        Self { annual }
    }

    /// Rolls up a year. Salary tax and the marginal bracket come from the
    /// last record; an empty slice counts as no tax.
    pub fn summarize(
        &self,
        input: &AnnualSummaryInput,
        months: &[MonthlyTaxRecord],
    ) -> AnnualSummary {
        let year = Decimal::from(MONTHS_PER_YEAR);
        let (salary_tax, taxable_income) = months
            .last()
            .map(|m| (m.accumulated_tax, m.accumulated_taxable_income))
            .unwrap_or_default();

        let pre_tax = round_half_up(input.monthly_salary * year + input.bonus);
        let social_personal = round_half_up(input.monthly_social * year);
        let fund_personal = round_half_up(input.employee_fund * year);
        let fund_employer = round_half_up(input.employer_fund * year);
        let total_tax = round_half_up(salary_tax + input.separate_bonus_tax);
        let after_tax = round_half_up(pre_tax - social_personal - fund_personal - total_tax);
        let marginal = self.annual.marginal(taxable_income);

        AnnualSummary {
            pre_tax,
            social_personal,
            fund_personal,
            fund_employer,
            special_deduction: round_half_up(input.special_deduction * year),
            salary_tax,
            bonus_tax: input.separate_bonus_tax,
            total_tax,
            after_tax,
            total_income: round_half_up(after_tax + fund_personal + fund_employer),
            social_and_tax_total: round_half_up(social_personal + fund_personal + total_tax),
            taxable_income,
            marginal_rate_pct: marginal.rate_pct,
            quick_deduction: marginal.quick_deduction,
        }
    }
}
