use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Full-year totals derived from the twelve monthly records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnnualSummary {
    /// Twelve months of salary plus the gross bonus.
    pub pre_tax: Decimal,
    pub social_personal: Decimal,
    pub fund_personal: Decimal,
    pub fund_employer: Decimal,
    pub special_deduction: Decimal,

    /// Cumulative tax at month 12. Includes the bonus under combined taxation.
    pub salary_tax: Decimal,
    /// Separate bonus tax; always 0 under combined taxation.
    pub bonus_tax: Decimal,
    pub total_tax: Decimal,

    pub after_tax: Decimal,
    /// After-tax income plus both housing-fund shares.
    pub total_income: Decimal,
    /// Personal social insurance, personal fund and tax combined.
    pub social_and_tax_total: Decimal,

    pub taxable_income: Decimal,
    pub marginal_rate_pct: Decimal,
    pub quick_deduction: Decimal,
}
