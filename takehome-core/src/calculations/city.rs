//! City parameter resolution.
//!
//! Turns a city identifier plus a [`CityDataSource`] into the
//! [`CityParameters`] used by the contribution calculators. Resolution
//! never fails: absent or malformed data falls back to documented
//! defaults and is reported with a warning.
//!
//! | Field        | Source text | Fallback        |
//! |--------------|-------------|-----------------|
//! | pension      | `"8%"`      | 8%              |
//! | medical      | `"2%+3"`    | 2%, fixed 0     |
//! | unemployment | `"0.5%"`    | 0.5%            |
//! | base bounds  | numbers     | 7460 / 37302    |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use takehome_core::calculations::CityParameterResolver;
//! use takehome_core::{CityRecord, CityTable, CustomRatios};
//!
//! let mut cities = CityTable::new();
//! cities.insert(
//!     "北京市",
//!     CityRecord {
//!         social_base_min: Some(dec!(7162)),
//!         social_base_max: Some(dec!(35811)),
//!         fund_base_min: Some(dec!(2540)),
//!         fund_base_max: Some(dec!(35811)),
//!         pension_ratio: Some("8%".to_string()),
//!         medical_ratio: Some("2%+3".to_string()),
//!         unemployment_ratio: Some("0.5%".to_string()),
//!     },
//! );
//!
//! let resolver = CityParameterResolver::new(&cities);
//! let params = resolver.resolve("beijing", &CustomRatios::default());
//!
//! assert_eq!(params.medical_ratio, dec!(0.02));
//! assert_eq!(params.medical_fixed_amount, dec!(3));
//! ```

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{CityParameters, CityRecord, CustomRatios};
use crate::parse::leading_decimal;
use crate::source::CityDataSource;

/// City used when an identifier is not recognised.
pub const DEFAULT_CITY_NAME: &str = "上海市";

/// Identifier of the user-configured city.
pub const CUSTOM_CITY_ID: &str = "custom";

const CUSTOM_CITY_ALIASES: [&str; 3] = [CUSTOM_CITY_ID, "other", "其他城市"];

/// Short identifiers and the canonical names they stand for.
pub const CITY_KEYS: [(&str, &str); 36] = [
    ("beijing", "北京市"),
    ("shanghai", "上海市"),
    ("tianjin", "天津市"),
    ("chongqing", "重庆市"),
    ("shijiazhuang", "石家庄市"),
    ("taiyuan", "太原市"),
    ("huhehaote", "呼和浩特市"),
    ("shenyang", "沈阳市"),
    ("changchun", "长春市"),
    ("haerbin", "哈尔滨市"),
    ("nanjing", "南京市"),
    ("hangzhou", "杭州市"),
    ("hefei", "合肥市"),
    ("fuzhou", "福州市"),
    ("nanchang", "南昌市"),
    ("jinan", "济南市"),
    ("zhengzhou", "郑州市"),
    ("wuhan", "武汉市"),
    ("changsha", "长沙市"),
    ("guangzhou", "广州市"),
    ("nanning", "南宁市"),
    ("haikou", "海口市"),
    ("chengdu", "成都市"),
    ("guiyang", "贵阳市"),
    ("kunming", "昆明市"),
    ("lasa", "拉萨市"),
    ("xian", "西安市"),
    ("lanzhou", "兰州市"),
    ("xining", "西宁市"),
    ("yinchuan", "银川市"),
    ("wulumuqi", "乌鲁木齐市"),
    ("dalian", "大连市"),
    ("qingdao", "青岛市"),
    ("ningbo", "宁波市"),
    ("xiamen", "厦门市"),
    ("shenzhen", "深圳市"),
];

static RATIO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9.]+)%?").expect("valid ratio regex"));

static RATIO_WITH_FIXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9.]+)%?(?:\s*\+\s*([0-9.]+))?").expect("valid ratio+fixed regex")
});

/// A ratio and optional flat amount parsed from text such as `"2%+3"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatioWithFixed {
    pub ratio: Decimal,
    pub fixed: Option<Decimal>,
}

/// Parses the first number in `text` as a percentage and returns it as a ratio.
///
/// Returns `fallback` when `text` is absent, empty, or holds no number.
/// An explicit `"0%"` yields 0.
pub fn parse_ratio(
    text: Option<&str>,
    fallback: Decimal,
) -> Decimal {
    text.filter(|t| !t.trim().is_empty())
        .and_then(|t| RATIO.captures(t))
        .and_then(|c| leading_decimal(&c[1]))
        .map(|pct| pct / Decimal::ONE_HUNDRED)
        .unwrap_or(fallback)
}

/// Parses `<ratio>%?(+<fixed>)?`; each part falls back independently.
pub fn parse_ratio_with_fixed(
    text: Option<&str>,
    fallback_ratio: Decimal,
    fallback_fixed: Option<Decimal>,
) -> RatioWithFixed {
    let captures = text
        .filter(|t| !t.trim().is_empty())
        .and_then(|t| RATIO_WITH_FIXED.captures(t));

    let Some(captures) = captures else {
        return RatioWithFixed {
            ratio: fallback_ratio,
            fixed: fallback_fixed,
        };
    };

    let ratio = captures
        .get(1)
        .and_then(|m| leading_decimal(m.as_str()))
        .map(|pct| pct / Decimal::ONE_HUNDRED)
        .unwrap_or(fallback_ratio);
    let fixed = captures
        .get(2)
        .and_then(|m| leading_decimal(m.as_str()))
        .or(fallback_fixed);

    RatioWithFixed { ratio, fixed }
}

/// Returns true for every spelling of the custom city.
pub fn is_custom_city(city_id: &str) -> bool {
    CUSTOM_CITY_ALIASES.contains(&city_id.trim())
}

/// Maps a short key to its canonical name; other identifiers pass through.
pub fn canonical_city_name(city_id: &str) -> &str {
    let id = city_id.trim();
    CITY_KEYS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(id))
        .map(|(_, name)| *name)
        .unwrap_or(id)
}

/// Resolves city identifiers against an injected [`CityDataSource`].
#[derive(Debug, Clone, Copy)]
pub struct CityParameterResolver<'a, S: CityDataSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: CityDataSource + ?Sized> CityParameterResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Produces the parameters for `city_id`.
    ///
    /// `city_id` may be a short key (`beijing`), a canonical name
    /// (`北京市`) or the custom city. `overrides` is only consulted for the
    /// custom city.
    pub fn resolve(
        &self,
        city_id: &str,
        overrides: &CustomRatios,
    ) -> CityParameters {
        let Some(name) = self.resolved_name(city_id) else {
            return Self::custom(overrides);
        };
        if name != canonical_city_name(city_id) {
            warn!(city = city_id, fallback = name, "unknown city; using default city");
        }

        match self.source.city_record(name) {
            Some(record) => {
                let params = Self::from_record(name, record);
                debug!(city = name, ?params, "resolved city parameters");
                params
            }
            None => {
                warn!(city = name, "no parameter record for city; using national defaults");
                CityParameters::default()
            }
        }
    }

    /// The canonical name whose record [`resolve`](Self::resolve) reads for
    /// `city_id`, or `None` for the custom city.
    pub fn resolved_name<'b>(
        &self,
        city_id: &'b str,
    ) -> Option<&'b str> {
        if is_custom_city(city_id) {
            return None;
        }

        let name = canonical_city_name(city_id);
        let listed = CITY_KEYS.iter().any(|(_, known)| *known == name);
        if listed || self.source.city_record(name).is_some() {
            Some(name)
        } else {
            Some(DEFAULT_CITY_NAME)
        }
    }

    fn custom(overrides: &CustomRatios) -> CityParameters {
        let ratio = |pct: Option<Decimal>, fallback: Decimal| {
            pct.map(|p| p / Decimal::ONE_HUNDRED).unwrap_or(fallback)
        };

        CityParameters::unconstrained(
            ratio(overrides.pension_pct, CityParameters::DEFAULT_PENSION_RATIO),
            ratio(overrides.medical_pct, CityParameters::DEFAULT_MEDICAL_RATIO),
            ratio(overrides.unemployment_pct, CityParameters::DEFAULT_UNEMPLOYMENT_RATIO),
        )
    }

    fn from_record(
        name: &str,
        record: &CityRecord,
    ) -> CityParameters {
        let (social_base_min, social_base_max) = ordered_bounds(
            name,
            "social",
            record.social_base_min.unwrap_or(CityParameters::DEFAULT_BASE_MIN),
            record.social_base_max.unwrap_or(CityParameters::DEFAULT_BASE_MAX),
        );
        let (fund_base_min, fund_base_max) = ordered_bounds(
            name,
            "fund",
            record.fund_base_min.unwrap_or(CityParameters::DEFAULT_BASE_MIN),
            record.fund_base_max.unwrap_or(CityParameters::DEFAULT_BASE_MAX),
        );

        let medical = parse_ratio_with_fixed(
            record.medical_ratio.as_deref(),
            CityParameters::DEFAULT_MEDICAL_RATIO,
            None,
        );

        CityParameters {
            social_base_min,
            social_base_max,
            fund_base_min,
            fund_base_max,
            pension_ratio: parse_ratio(
                record.pension_ratio.as_deref(),
                CityParameters::DEFAULT_PENSION_RATIO,
            ),
            medical_ratio: medical.ratio,
            // A city without a fixed component must not inherit one.
            medical_fixed_amount: medical.fixed.unwrap_or(Decimal::ZERO),
            unemployment_ratio: parse_ratio(
                record.unemployment_ratio.as_deref(),
                CityParameters::DEFAULT_UNEMPLOYMENT_RATIO,
            ),
        }
    }
}

fn ordered_bounds(
    city: &str,
    kind: &'static str,
    min: Decimal,
    max: Decimal,
) -> (Decimal, Decimal) {
    if min > max {
        warn!(city, kind, min = %min, max = %max, "base bounds inverted; swapping");
        (max, min)
    } else {
        (min, max)
    }
}
