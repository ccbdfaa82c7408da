mod annual_summary;
mod bonus;
mod city_parameters;
mod city_record;
mod contribution;
mod deduction;
mod monthly_record;
mod payroll_input;
mod tax_bracket;

pub use annual_summary::AnnualSummary;
pub use bonus::{BonusMonth, BonusTaxMode, BonusTaxResult};
pub use city_parameters::{CityParameters, CustomRatios};
pub use city_record::CityRecord;
pub use contribution::ContributionResult;
pub use deduction::{DeductionSelection, SpecialDeduction};
pub use monthly_record::MonthlyTaxRecord;
pub use payroll_input::{DEFAULT_FUND_RATIO, MAX_AMOUNT, PayrollInput, PayrollReport};
pub use tax_bracket::{
    ANNUAL_TAX_BRACKETS, BracketTableError, MONTHLY_BONUS_TAX_BRACKETS, MarginalBracket,
    TaxBracket, TaxBracketTable, TaxTables,
};
