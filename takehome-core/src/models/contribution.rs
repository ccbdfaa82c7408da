use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Personal social-insurance contribution for one month.
///
/// Every line item is rounded to cents on its own and `total` is the sum of
/// the rounded items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContributionResult {
    /// Contribution base after clamping to the city bounds.
    pub base: Decimal,
    pub pension: Decimal,
    pub medical: Decimal,
    pub unemployment: Decimal,
    pub total: Decimal,
}
