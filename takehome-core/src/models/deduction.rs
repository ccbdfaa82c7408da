//! Monthly special additional deductions and their exclusion rules.
//!
//! | Key            | Category                               | Monthly amount |
//! |----------------|----------------------------------------|----------------|
//! | `rent`         | Housing rent                           | 1500           |
//! | `loan_100`     | Housing loan interest, claimed in full | 1000           |
//! | `loan_50`      | Housing loan interest, split 50%       | 500            |
//! | `elder`        | Elder support, sole child              | 3000           |
//! | `elder_share`  | Elder support, shared                  | 1500           |
//! | `children_100` | Child education, claimed in full       | 2000           |
//! | `children_50`  | Child education, split 50%             | 1000           |
//! | `baby_100`     | Infant care, claimed in full           | 2000           |
//! | `baby_50`      | Infant care, split 50%                 | 1000           |
//!
//! Rent and loan interest cannot be claimed together, and each full/split
//! pair is exclusive.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpecialDeduction {
    #[serde(rename = "rent")]
    HousingRent,
    #[serde(rename = "loan_100")]
    HousingLoanFull,
    #[serde(rename = "loan_50")]
    HousingLoanHalf,
    #[serde(rename = "elder")]
    ElderSoleChild,
    #[serde(rename = "elder_share")]
    ElderShared,
    #[serde(rename = "children_100")]
    ChildEducationFull,
    #[serde(rename = "children_50")]
    ChildEducationHalf,
    #[serde(rename = "baby_100")]
    InfantCareFull,
    #[serde(rename = "baby_50")]
    InfantCareHalf,
}

impl SpecialDeduction {
    pub const ALL: [Self; 9] = [
        Self::HousingRent,
        Self::HousingLoanFull,
        Self::HousingLoanHalf,
        Self::ElderSoleChild,
        Self::ElderShared,
        Self::ChildEducationFull,
        Self::ChildEducationHalf,
        Self::InfantCareFull,
        Self::InfantCareHalf,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::HousingRent => "rent",
            Self::HousingLoanFull => "loan_100",
            Self::HousingLoanHalf => "loan_50",
            Self::ElderSoleChild => "elder",
            Self::ElderShared => "elder_share",
            Self::ChildEducationFull => "children_100",
            Self::ChildEducationHalf => "children_50",
            Self::InfantCareFull => "baby_100",
            Self::InfantCareHalf => "baby_50",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.key() == key.trim())
    }

    pub fn monthly_amount(&self) -> Decimal {
        let amount = match self {
            Self::HousingRent => 1500,
            Self::HousingLoanFull => 1000,
            Self::HousingLoanHalf => 500,
            Self::ElderSoleChild => 3000,
            Self::ElderShared => 1500,
            Self::ChildEducationFull => 2000,
            Self::ChildEducationHalf => 1000,
            Self::InfantCareFull => 2000,
            Self::InfantCareHalf => 1000,
        };
        Decimal::from(amount)
    }

    /// Categories that cannot be claimed alongside this one.
    pub fn excludes(&self) -> &'static [Self] {
        match self {
            Self::HousingRent => &[Self::HousingLoanFull, Self::HousingLoanHalf],
            Self::HousingLoanFull => &[Self::HousingRent, Self::HousingLoanHalf],
            Self::HousingLoanHalf => &[Self::HousingRent, Self::HousingLoanFull],
            Self::ElderSoleChild => &[Self::ElderShared],
            Self::ElderShared => &[Self::ElderSoleChild],
            Self::ChildEducationFull => &[Self::ChildEducationHalf],
            Self::ChildEducationHalf => &[Self::ChildEducationFull],
            Self::InfantCareFull => &[Self::InfantCareHalf],
            Self::InfantCareHalf => &[Self::InfantCareFull],
        }
    }
}

/// A set of claimed deductions that never holds two exclusive categories.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DeductionSelection {
    selected: BTreeSet<SpecialDeduction>,
}

impl DeductionSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `deduction`, dropping any selected category it excludes.
    pub fn select(
        &mut self,
        deduction: SpecialDeduction,
    ) {
        for excluded in deduction.excludes() {
            self.selected.remove(excluded);
        }
        self.selected.insert(deduction);
    }

    pub fn deselect(
        &mut self,
        deduction: SpecialDeduction,
    ) {
        self.selected.remove(&deduction);
    }

    pub fn contains(
        &self,
        deduction: SpecialDeduction,
    ) -> bool {
        self.selected.contains(&deduction)
    }

    pub fn iter(&self) -> impl Iterator<Item = SpecialDeduction> + '_ {
        self.selected.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Sum of the monthly amounts of every selected category.
    pub fn monthly_total(&self) -> Decimal {
        self.selected.iter().map(SpecialDeduction::monthly_amount).sum()
    }
}

/// Selects each item in order, so a later category wins over an earlier
/// exclusive one.
impl FromIterator<SpecialDeduction> for DeductionSelection {
    fn from_iter<I: IntoIterator<Item = SpecialDeduction>>(iter: I) -> Self {
        let mut selection = Self::new();
        for deduction in iter {
            selection.select(deduction);
        }
        selection
    }
}
