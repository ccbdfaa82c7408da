//! Scenario files and their merge with command-line flags.
//!
//! A scenario is a TOML file describing one person's pay:
//!
//! ```toml
//! city = "beijing"
//! salary = 20000
//! deductions = ["rent", "elder"]
//! fund_ratio = 7          # percent
//! bonus = 60000
//! bonus_month = 12
//! bonus_mode = "separate"
//!
//! [custom]                # only read for city = "custom"
//! pension = 8
//! medical = 2
//! unemployment = 0.5
//! ```
//!
//! Every field is optional. Flags given on the command line replace the
//! file's values field by field.

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use takehome_core::calculations::quick_bonus;
use takehome_core::{
    BonusMonth, BonusTaxMode, CustomRatios, DeductionSelection, PayrollInput, SpecialDeduction,
};
use thiserror::Error;
use tracing::warn;

/// City used when neither the scenario nor the flags name one.
pub const DEFAULT_CITY: &str = "shanghai";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown deduction '{0}' (expected one of: {known})", known = known_deductions())]
    UnknownDeduction(String),
}

fn known_deductions() -> String {
    SpecialDeduction::ALL
        .iter()
        .map(SpecialDeduction::key)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Percentage overrides for the custom city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomSection {
    pub pension: Option<Decimal>,
    pub medical: Option<Decimal>,
    pub unemployment: Option<Decimal>,
}

/// The raw, partially filled scenario from a file or from flags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    pub city: Option<String>,
    pub salary: Option<Decimal>,
    pub special_deduction: Option<Decimal>,
    pub deductions: Option<Vec<String>>,
    pub social_base: Option<Decimal>,
    pub fund_base: Option<Decimal>,
    /// Employee housing-fund ratio in percent.
    pub fund_ratio: Option<Decimal>,
    /// Employer housing-fund ratio in percent.
    pub employer_fund_ratio: Option<Decimal>,
    pub bonus: Option<Decimal>,
    /// Bonus as a multiple of the monthly salary.
    pub bonus_months: Option<u32>,
    pub bonus_month: Option<i64>,
    pub bonus_mode: Option<String>,
    pub cities_file: Option<PathBuf>,
    pub brackets_file: Option<PathBuf>,
    #[serde(default)]
    pub custom: CustomSection,
}

/// A fully resolved scenario, ready to calculate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub city: String,
    pub input: PayrollInput,
    pub custom: CustomRatios,
    pub deductions: DeductionSelection,
    pub cities_file: Option<PathBuf>,
    pub brackets_file: Option<PathBuf>,
}

impl ScenarioConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a scenario file. Relative data-file paths inside it are taken
    /// relative to the scenario's own directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;

        let base = path.parent().unwrap_or(Path::new(""));
        config.cities_file = config.cities_file.map(|p| base.join(p));
        config.brackets_file = config.brackets_file.map(|p| base.join(p));
        Ok(config)
    }

    /// Layers `overrides` on top of `self`.
    ///
    /// Alternative spellings of the same quantity travel together: an
    /// override of `deductions` drops the base `special_deduction` and vice
    /// versa, and likewise for `bonus` and `bonus_months`.
    pub fn merge(
        self,
        overrides: ScenarioConfig,
    ) -> ScenarioConfig {
        let (special_deduction, deductions) =
            if overrides.special_deduction.is_some() || overrides.deductions.is_some() {
                (overrides.special_deduction, overrides.deductions)
            } else {
                (self.special_deduction, self.deductions)
            };
        let (bonus, bonus_months) = if overrides.bonus.is_some() || overrides.bonus_months.is_some()
        {
            (overrides.bonus, overrides.bonus_months)
        } else {
            (self.bonus, self.bonus_months)
        };

        ScenarioConfig {
            city: overrides.city.or(self.city),
            salary: overrides.salary.or(self.salary),
            special_deduction,
            deductions,
            social_base: overrides.social_base.or(self.social_base),
            fund_base: overrides.fund_base.or(self.fund_base),
            fund_ratio: overrides.fund_ratio.or(self.fund_ratio),
            employer_fund_ratio: overrides.employer_fund_ratio.or(self.employer_fund_ratio),
            bonus,
            bonus_months,
            bonus_month: overrides.bonus_month.or(self.bonus_month),
            bonus_mode: overrides.bonus_mode.or(self.bonus_mode),
            cities_file: overrides.cities_file.or(self.cities_file),
            brackets_file: overrides.brackets_file.or(self.brackets_file),
            custom: CustomSection {
                pension: overrides.custom.pension.or(self.custom.pension),
                medical: overrides.custom.medical.or(self.custom.medical),
                unemployment: overrides.custom.unemployment.or(self.custom.unemployment),
            },
        }
    }

    /// Fills in defaults and converts to calculation input.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownDeduction`] for a deduction key that
    /// names no category.
    pub fn resolve(&self) -> Result<Scenario, ConfigError> {
        let monthly_salary = self.salary.unwrap_or_default();
        let deductions = self.deduction_selection()?;

        let special_deduction = match (self.special_deduction, &self.deductions) {
            (Some(amount), Some(_)) => {
                warn!(amount = %amount, "both special_deduction and deductions given; using the amount");
                amount
            }
            (Some(amount), None) => amount,
            (None, _) => deductions.monthly_total(),
        };

        let year_bonus = self
            .bonus
            .or_else(|| self.bonus_months.map(|months| quick_bonus(monthly_salary, months)))
            .unwrap_or_default();

        let bonus_mode = match self.bonus_mode.as_deref() {
            None => BonusTaxMode::default(),
            Some(text) => BonusTaxMode::parse(text).unwrap_or_else(|| {
                warn!(mode = text, "unknown bonus mode; using separate");
                BonusTaxMode::Separate
            }),
        };

        let percent = |pct: Decimal| pct / Decimal::ONE_HUNDRED;

        Ok(Scenario {
            city: self.city.clone().unwrap_or_else(|| DEFAULT_CITY.to_string()),
            input: PayrollInput {
                monthly_salary,
                special_deduction,
                social_base: self.social_base,
                fund_base: self.fund_base,
                employee_fund_ratio: self.fund_ratio.map(percent),
                employer_fund_ratio: self.employer_fund_ratio.map(percent),
                year_bonus,
                bonus_month: self.bonus_month.map(BonusMonth::new).unwrap_or_default(),
                bonus_mode,
            },
            custom: CustomRatios {
                pension_pct: self.custom.pension,
                medical_pct: self.custom.medical,
                unemployment_pct: self.custom.unemployment,
            },
            deductions,
            cities_file: self.cities_file.clone(),
            brackets_file: self.brackets_file.clone(),
        })
    }

    fn deduction_selection(&self) -> Result<DeductionSelection, ConfigError> {
        let keys = self.deductions.as_deref().unwrap_or_default();
        keys.iter()
            .map(|key| {
                SpecialDeduction::parse(key).ok_or_else(|| ConfigError::UnknownDeduction(key.clone()))
            })
            .collect()
    }
}
