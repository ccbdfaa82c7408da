use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A raw city entry as supplied by the parameter data source.
///
/// Base bounds are numbers; ratios are free text such as `"8%"` or
/// `"2%+3"` and are interpreted by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CityRecord {
    #[serde(rename = "social_security_base_lower_limit")]
    pub social_base_min: Option<Decimal>,
    #[serde(rename = "social_security_base_upper_limit")]
    pub social_base_max: Option<Decimal>,
    #[serde(rename = "housing_fund_base_lower_limit")]
    pub fund_base_min: Option<Decimal>,
    #[serde(rename = "housing_fund_base_upper_limit")]
    pub fund_base_max: Option<Decimal>,
    #[serde(rename = "endowment_insurance_ratio")]
    pub pension_ratio: Option<String>,
    #[serde(rename = "medical_insurance_ratio")]
    pub medical_ratio: Option<String>,
    #[serde(rename = "unemployment_insurance_ratio")]
    pub unemployment_ratio: Option<String>,
}
