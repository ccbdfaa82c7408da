use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{
    AnnualSummary, BonusMonth, BonusTaxMode, BonusTaxResult, CityParameters, ContributionResult,
    MonthlyTaxRecord,
};

/// Housing-fund ratio used when none is supplied (7%).
pub const DEFAULT_FUND_RATIO: Decimal = Decimal::from_parts(7, 0, 0, false, 2);

/// Largest accepted monthly amount (10^12). Larger inputs are capped so
/// yearly products stay far inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Everything a take-home pay calculation needs besides the city parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayrollInput {
    pub monthly_salary: Decimal,

    /// Sum of the monthly special additional deductions.
    pub special_deduction: Decimal,

    /// Social-insurance base; the monthly salary when `None`.
    pub social_base: Option<Decimal>,

    /// Housing-fund base; the monthly salary when `None`.
    pub fund_base: Option<Decimal>,

    /// Employee housing-fund ratio (0.07 for 7%); [`DEFAULT_FUND_RATIO`] when `None`.
    pub employee_fund_ratio: Option<Decimal>,

    /// Employer housing-fund ratio; [`DEFAULT_FUND_RATIO`] when `None`.
    pub employer_fund_ratio: Option<Decimal>,

    pub year_bonus: Decimal,
    pub bonus_month: BonusMonth,
    pub bonus_mode: BonusTaxMode,
}

impl PayrollInput {
    /// Returns a copy with out-of-range values coerced to the nearest valid
    /// value: money is kept within `[0, MAX_AMOUNT]` and fund ratios within
    /// `[0, 1]`.
    pub fn sanitized(&self) -> Self {
        Self {
            monthly_salary: bounded_amount("monthly_salary", self.monthly_salary),
            special_deduction: bounded_amount("special_deduction", self.special_deduction),
            social_base: self.social_base.map(|b| bounded_amount("social_base", b)),
            fund_base: self.fund_base.map(|b| bounded_amount("fund_base", b)),
            employee_fund_ratio: self
                .employee_fund_ratio
                .map(|r| unit_interval("employee_fund_ratio", r)),
            employer_fund_ratio: self
                .employer_fund_ratio
                .map(|r| unit_interval("employer_fund_ratio", r)),
            year_bonus: bounded_amount("year_bonus", self.year_bonus),
            bonus_month: self.bonus_month,
            bonus_mode: self.bonus_mode,
        }
    }

    pub fn effective_social_base(&self) -> Decimal {
        self.social_base.unwrap_or(self.monthly_salary)
    }

    pub fn effective_fund_base(&self) -> Decimal {
        self.fund_base.unwrap_or(self.monthly_salary)
    }

    pub fn effective_employee_fund_ratio(&self) -> Decimal {
        self.employee_fund_ratio.unwrap_or(DEFAULT_FUND_RATIO)
    }

    pub fn effective_employer_fund_ratio(&self) -> Decimal {
        self.employer_fund_ratio.unwrap_or(DEFAULT_FUND_RATIO)
    }
}

fn bounded_amount(
    field: &'static str,
    value: Decimal,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(field, value = %value, "negative amount; using 0");
        return Decimal::ZERO;
    }
    if value > MAX_AMOUNT {
        warn!(field, value = %value, cap = %MAX_AMOUNT, "amount too large; capped");
        return MAX_AMOUNT;
    }
    value
}

fn unit_interval(
    field: &'static str,
    value: Decimal,
) -> Decimal {
    let clamped = value.clamp(Decimal::ZERO, Decimal::ONE);
    if clamped != value {
        warn!(field, value = %value, clamped = %clamped, "ratio outside [0, 1]; clamped");
    }
    clamped
}

/// The complete result of one take-home pay calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollReport {
    /// The parameter snapshot the calculation used.
    pub city: CityParameters,
    pub social: ContributionResult,
    pub employee_fund: Decimal,
    pub employer_fund: Decimal,
    pub bonus_mode: BonusTaxMode,
    pub bonus_month: BonusMonth,
    pub bonus: BonusTaxResult,
    pub months: Vec<MonthlyTaxRecord>,
    pub annual: AnnualSummary,
}
