use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cumulative withholding state and take-home figures for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTaxRecord {
    /// Calendar month, 1-12.
    pub month: u32,

    // Year-to-date values through this month
    pub accumulated_income: Decimal,
    pub accumulated_contributions: Decimal,
    pub accumulated_basic_deduction: Decimal,
    pub accumulated_special_deduction: Decimal,
    pub accumulated_taxable_income: Decimal,
    pub accumulated_tax: Decimal,
    pub previous_accumulated_tax: Decimal,

    /// Tax withheld this month: the increase in cumulative tax.
    pub current_month_tax: Decimal,

    /// Cash received this month after contributions and tax.
    pub after_tax_income: Decimal,

    /// After-tax cash plus employee and employer housing-fund deposits.
    pub total_income_including_fund: Decimal,

    pub has_bonus: bool,

    /// After-tax bonus included in `after_tax_income`; only set for a
    /// separately taxed bonus in its payment month.
    pub bonus_after_tax: Decimal,

    pub marginal_rate_pct: Decimal,
    pub quick_deduction: Decimal,
}
