use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Contribution bases and personal ratios in force for one city.
///
/// Values of this type are snapshots: the resolver builds a fresh one for
/// every city selection and the calculators only ever read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityParameters {
    pub social_base_min: Decimal,
    pub social_base_max: Decimal,
    pub fund_base_min: Decimal,
    pub fund_base_max: Decimal,
    pub pension_ratio: Decimal,
    pub medical_ratio: Decimal,
    /// Flat monthly amount added to the medical contribution (e.g. the `+3` in `2%+3`).
    pub medical_fixed_amount: Decimal,
    pub unemployment_ratio: Decimal,
}

impl CityParameters {
    pub const DEFAULT_BASE_MIN: Decimal = Decimal::from_parts(7460, 0, 0, false, 0);
    pub const DEFAULT_BASE_MAX: Decimal = Decimal::from_parts(37302, 0, 0, false, 0);
    pub const DEFAULT_PENSION_RATIO: Decimal = Decimal::from_parts(8, 0, 0, false, 2);
    pub const DEFAULT_MEDICAL_RATIO: Decimal = Decimal::from_parts(2, 0, 0, false, 2);
    pub const DEFAULT_UNEMPLOYMENT_RATIO: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

    /// Parameters with unconstrained bases, as used by the custom city.
    pub fn unconstrained(
        pension_ratio: Decimal,
        medical_ratio: Decimal,
        unemployment_ratio: Decimal,
    ) -> Self {
        Self {
            social_base_min: Decimal::ZERO,
            social_base_max: Decimal::MAX,
            fund_base_min: Decimal::ZERO,
            fund_base_max: Decimal::MAX,
            pension_ratio,
            medical_ratio,
            medical_fixed_amount: Decimal::ZERO,
            unemployment_ratio,
        }
    }
}

impl Default for CityParameters {
    fn default() -> Self {
        Self {
            social_base_min: Self::DEFAULT_BASE_MIN,
            social_base_max: Self::DEFAULT_BASE_MAX,
            fund_base_min: Self::DEFAULT_BASE_MIN,
            fund_base_max: Self::DEFAULT_BASE_MAX,
            pension_ratio: Self::DEFAULT_PENSION_RATIO,
            medical_ratio: Self::DEFAULT_MEDICAL_RATIO,
            medical_fixed_amount: Decimal::ZERO,
            unemployment_ratio: Self::DEFAULT_UNEMPLOYMENT_RATIO,
        }
    }
}

/// User-entered percentage overrides for the custom city.
///
/// Each field is a percentage (`8` means 8%). `None` means the field was left
/// empty or did not hold a number; an explicit `0` is kept as 0%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomRatios {
    pub pension_pct: Option<Decimal>,
    pub medical_pct: Option<Decimal>,
    pub unemployment_pct: Option<Decimal>,
}
