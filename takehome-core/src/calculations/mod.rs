//! Take-home pay calculation modules.
//!
//! This module provides the withholding engine: city parameter resolution,
//! contributions, cumulative salary tax, separate bonus tax and the annual
//! roll-up, plus [`PayrollCalculator`] which runs them in order.

pub mod annual;
pub mod bonus;
pub mod city;
pub mod common;
pub mod contributions;
pub mod cumulative;
pub mod payroll;
pub mod progressive;

pub use annual::{AnnualAggregator, AnnualSummaryInput};
pub use bonus::BonusTaxCalculator;
pub use city::{
    CITY_KEYS, CityParameterResolver, DEFAULT_CITY_NAME, RatioWithFixed, canonical_city_name,
    is_custom_city, parse_ratio, parse_ratio_with_fixed,
};
pub use contributions::ContributionCalculator;
pub use cumulative::{BASIC_DEDUCTION, CumulativeTaxEngine, CumulativeTaxInput};
pub use payroll::{PayrollCalculator, quick_bonus};
pub use progressive::{progressive_tax, quick_deduction_tax};
