use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How a year-end bonus is taxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BonusTaxMode {
    /// Taxed on its own through the monthly-equivalent table.
    #[default]
    Separate,
    /// Folded into cumulative salary income from the payment month onwards.
    #[serde(alias = "combine")]
    Combined,
}

impl BonusTaxMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Separate => "separate",
            Self::Combined => "combined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "separate" => Some(Self::Separate),
            "combine" | "combined" => Some(Self::Combined),
            _ => None,
        }
    }
}

/// Month (1-12) in which the bonus is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "u32")]
pub struct BonusMonth(u32);

impl BonusMonth {
    pub const DECEMBER: Self = Self(12);

    /// Accepts any integer; values outside 1-12 fall back to December.
    pub fn new(month: i64) -> Self {
        match u32::try_from(month) {
            Ok(m @ 1..=12) => Self(m),
            _ => {
                warn!(month, "bonus month outside 1-12; using 12");
                Self::DECEMBER
            }
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for BonusMonth {
    fn default() -> Self {
        Self::DECEMBER
    }
}

impl From<i64> for BonusMonth {
    fn from(month: i64) -> Self {
        Self::new(month)
    }
}

impl From<BonusMonth> for u32 {
    fn from(month: BonusMonth) -> Self {
        month.0
    }
}

/// Tax on a bonus taxed separately from salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BonusTaxResult {
    pub tax: Decimal,
    pub after_tax: Decimal,
    pub rate_pct: Decimal,
    pub quick_deduction: Decimal,
}

impl BonusTaxResult {
    /// The result reported under combined taxation: no separate tax, the
    /// gross bonus passes through untouched.
    pub fn untaxed(bonus: Decimal) -> Self {
        Self {
            after_tax: bonus,
            ..Self::default()
        }
    }
}
