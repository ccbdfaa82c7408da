use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of a progressive rate table.
///
/// A bracket applies to the part of an amount that lies strictly above
/// `threshold`. `quick_deduction` is the constant that lets the whole amount
/// be taxed at the marginal rate in a single step
/// (`amount × rate − quick_deduction`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub threshold: Decimal,
    pub rate: Decimal,
    pub quick_deduction: Decimal,
}

impl TaxBracket {
    pub const fn new(
        threshold: Decimal,
        rate: Decimal,
        quick_deduction: Decimal,
    ) -> Self {
        Self {
            threshold,
            rate,
            quick_deduction,
        }
    }
}

/// Statutory annual (cumulative withholding) rate table.
pub const ANNUAL_TAX_BRACKETS: [TaxBracket; 7] = [
    TaxBracket::new(Decimal::ZERO, Decimal::from_parts(3, 0, 0, false, 2), Decimal::ZERO),
    TaxBracket::new(
        Decimal::from_parts(36000, 0, 0, false, 0),
        Decimal::from_parts(10, 0, 0, false, 2),
        Decimal::from_parts(2520, 0, 0, false, 0),
    ),
    TaxBracket::new(
        Decimal::from_parts(144000, 0, 0, false, 0),
        Decimal::from_parts(20, 0, 0, false, 2),
        Decimal::from_parts(16920, 0, 0, false, 0),
    ),
    TaxBracket::new(
        Decimal::from_parts(300000, 0, 0, false, 0),
        Decimal::from_parts(25, 0, 0, false, 2),
        Decimal::from_parts(31920, 0, 0, false, 0),
    ),
    TaxBracket::new(
        Decimal::from_parts(420000, 0, 0, false, 0),
        Decimal::from_parts(30, 0, 0, false, 2),
        Decimal::from_parts(52920, 0, 0, false, 0),
    ),
    TaxBracket::new(
        Decimal::from_parts(660000, 0, 0, false, 0),
        Decimal::from_parts(35, 0, 0, false, 2),
        Decimal::from_parts(85920, 0, 0, false, 0),
    ),
    TaxBracket::new(
        Decimal::from_parts(960000, 0, 0, false, 0),
        Decimal::from_parts(45, 0, 0, false, 2),
        Decimal::from_parts(181920, 0, 0, false, 0),
    ),
];

/// Statutory monthly rate table, used to price a separately taxed bonus
/// from its monthly equivalent.
pub const MONTHLY_BONUS_TAX_BRACKETS: [TaxBracket; 7] = [
    TaxBracket::new(Decimal::ZERO, Decimal::from_parts(3, 0, 0, false, 2), Decimal::ZERO),
    TaxBracket::new(
        Decimal::from_parts(3000, 0, 0, false, 0),
        Decimal::from_parts(10, 0, 0, false, 2),
        Decimal::from_parts(210, 0, 0, false, 0),
    ),
    TaxBracket::new(
        Decimal::from_parts(12000, 0, 0, false, 0),
        Decimal::from_parts(20, 0, 0, false, 2),
        Decimal::from_parts(1410, 0, 0, false, 0),
    ),
    TaxBracket::new(
        Decimal::from_parts(25000, 0, 0, false, 0),
        Decimal::from_parts(25, 0, 0, false, 2),
        Decimal::from_parts(2660, 0, 0, false, 0),
    ),
    TaxBracket::new(
        Decimal::from_parts(35000, 0, 0, false, 0),
        Decimal::from_parts(30, 0, 0, false, 2),
        Decimal::from_parts(4410, 0, 0, false, 0),
    ),
    TaxBracket::new(
        Decimal::from_parts(55000, 0, 0, false, 0),
        Decimal::from_parts(35, 0, 0, false, 2),
        Decimal::from_parts(7160, 0, 0, false, 0),
    ),
    TaxBracket::new(
        Decimal::from_parts(80000, 0, 0, false, 0),
        Decimal::from_parts(45, 0, 0, false, 2),
        Decimal::from_parts(15160, 0, 0, false, 0),
    ),
];

/// Reasons a rate table is rejected by [`TaxBracketTable::new`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("rate table has no brackets")]
    Empty,

    #[error("first bracket must start at 0, got {0}")]
    FirstThresholdNotZero(Decimal),

    #[error("bracket {index}: threshold {threshold} is not above the previous threshold")]
    ThresholdNotAscending { index: usize, threshold: Decimal },

    #[error("bracket {index}: rate {rate} must be between 0 and 1")]
    RateOutOfRange { index: usize, rate: Decimal },

    #[error("bracket {index}: rate {rate} is not above the previous rate")]
    RateNotIncreasing { index: usize, rate: Decimal },

    #[error("bracket {index}: quick deduction {actual} does not match the continuous value {expected}")]
    QuickDeductionMismatch {
        index: usize,
        expected: Decimal,
        actual: Decimal,
    },
}

/// The marginal rate and quick deduction reported for an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarginalBracket {
    /// Rate as a percentage (`10` for 10%).
    pub rate_pct: Decimal,
    pub quick_deduction: Decimal,
}

impl MarginalBracket {
    pub const NONE: Self = Self {
        rate_pct: Decimal::ZERO,
        quick_deduction: Decimal::ZERO,
    };

    fn from_bracket(bracket: &TaxBracket) -> Self {
        Self {
            rate_pct: (bracket.rate * Decimal::ONE_HUNDRED).normalize(),
            quick_deduction: bracket.quick_deduction,
        }
    }
}

/// An ordered, validated progressive rate table covering `[0, ∞)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxBracketTable {
    brackets: Vec<TaxBracket>,
}

impl TaxBracketTable {
    /// Builds a table after checking the progressive shape.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] if the table is empty, does not start at
    /// 0, is not strictly ascending in threshold and rate, has a rate outside
    /// `[0, 1]`, or carries a quick deduction that would make the one-step
    /// formula disagree with the bracket-by-bracket sum.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        Self::validate(&brackets)?;
        Ok(Self { brackets })
    }

    /// The statutory annual cumulative-withholding table.
    pub fn annual() -> Self {
        Self {
            brackets: ANNUAL_TAX_BRACKETS.to_vec(),
        }
    }

    /// The statutory monthly table used for separately taxed bonuses.
    pub fn monthly_bonus() -> Self {
        Self {
            brackets: MONTHLY_BONUS_TAX_BRACKETS.to_vec(),
        }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Returns the highest bracket whose threshold lies strictly below `amount`.
    ///
    /// `None` when `amount` is 0 or negative.
    pub fn bracket_for(
        &self,
        amount: Decimal,
    ) -> Option<&TaxBracket> {
        self.brackets.iter().rev().find(|b| amount > b.threshold)
    }

    /// Marginal rate (as a percentage) and quick deduction for `amount`.
    pub fn marginal(
        &self,
        amount: Decimal,
    ) -> MarginalBracket {
        self.bracket_for(amount)
            .map(MarginalBracket::from_bracket)
            .unwrap_or(MarginalBracket::NONE)
    }

    fn validate(brackets: &[TaxBracket]) -> Result<(), BracketTableError> {
        let first = brackets.first().ok_or(BracketTableError::Empty)?;
        if first.threshold != Decimal::ZERO {
            return Err(BracketTableError::FirstThresholdNotZero(first.threshold));
        }

        let mut expected_quick_deduction = Decimal::ZERO;
        let mut previous: Option<&TaxBracket> = None;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketTableError::RateOutOfRange {
                    index,
                    rate: bracket.rate,
                });
            }

            if let Some(prev) = previous {
                if bracket.threshold <= prev.threshold {
                    return Err(BracketTableError::ThresholdNotAscending {
                        index,
                        threshold: bracket.threshold,
                    });
                }
                if bracket.rate <= prev.rate {
                    return Err(BracketTableError::RateNotIncreasing {
                        index,
                        rate: bracket.rate,
                    });
                }
                // Continuity at the threshold fixes the quick deduction.
                expected_quick_deduction += bracket.threshold * (bracket.rate - prev.rate);
            }

            if bracket.quick_deduction != expected_quick_deduction {
                return Err(BracketTableError::QuickDeductionMismatch {
                    index,
                    expected: expected_quick_deduction,
                    actual: bracket.quick_deduction,
                });
            }

            previous = Some(bracket);
        }

        Ok(())
    }
}

/// The pair of rate tables consulted by one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxTables {
    pub annual: TaxBracketTable,
    pub monthly_bonus: TaxBracketTable,
}

impl Default for TaxTables {
    fn default() -> Self {
        Self {
            annual: TaxBracketTable::annual(),
            monthly_bonus: TaxBracketTable::monthly_bonus(),
        }
    }
}
