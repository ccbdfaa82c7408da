use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use takehome_core::parse::parse_leading_decimal;
use takehome_core::{CityRecord, CityTable};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when loading city parameter data.
#[derive(Debug, Error)]
pub enum CityDataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("city data must be a JSON object keyed by city name")]
    NotAnObject,

    #[error("unsupported city data format '{0}' (expected .json or .csv)")]
    UnsupportedFormat(String),
}

impl From<csv::Error> for CityDataError {
    fn from(err: csv::Error) -> Self {
        CityDataError::CsvParse(err.to_string())
    }
}

impl From<serde_json::Error> for CityDataError {
    fn from(err: serde_json::Error) -> Self {
        CityDataError::JsonParse(err.to_string())
    }
}

/// A single row of a city parameter CSV file.
///
/// Columns:
/// - `city`: canonical city name (e.g. `北京市`)
/// - `social_security_base_lower_limit` / `social_security_base_upper_limit`
/// - `housing_fund_base_lower_limit` / `housing_fund_base_upper_limit`
/// - `endowment_insurance_ratio`, `medical_insurance_ratio`,
///   `unemployment_insurance_ratio`: free text such as `8%` or `2%+3`
///
/// Every column except `city` may be empty.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CityRow {
    pub city: String,
    #[serde(default, deserialize_with = "deserialize_lenient_decimal")]
    pub social_security_base_lower_limit: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_lenient_decimal")]
    pub social_security_base_upper_limit: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_lenient_decimal")]
    pub housing_fund_base_lower_limit: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_lenient_decimal")]
    pub housing_fund_base_upper_limit: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub endowment_insurance_ratio: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub medical_insurance_ratio: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub unemployment_insurance_ratio: Option<String>,
}

impl CityRow {
    /// Splits the row into its city name and the raw record.
    pub fn into_entry(self) -> (String, CityRecord) {
        (
            self.city.trim().to_string(),
            CityRecord {
                social_base_min: self.social_security_base_lower_limit,
                social_base_max: self.social_security_base_upper_limit,
                fund_base_min: self.housing_fund_base_lower_limit,
                fund_base_max: self.housing_fund_base_upper_limit,
                pension_ratio: self.endowment_insurance_ratio,
                medical_ratio: self.medical_insurance_ratio,
                unemployment_ratio: self.unemployment_insurance_ratio,
            },
        )
    }
}

/// Empty or unparseable cells become `None`; the resolver applies defaults.
fn deserialize_lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.as_deref().and_then(parse_leading_decimal))
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// Loader for city parameter files.
///
/// JSON files use the shape of the published `merged_city_data.json`: an
/// object keyed by city name whose values hold the seven parameter fields.
/// Fields may be numbers or strings; unknown fields are ignored.
pub struct CityDataLoader;

impl CityDataLoader {
    /// Loads a file, choosing the format from its extension.
    pub fn load_path(path: impl AsRef<Path>) -> Result<CityTable, CityDataError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let read = || {
            fs::read_to_string(path).map_err(|source| CityDataError::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        let table = match extension.as_str() {
            "json" => Self::parse_json(&read()?)?,
            "csv" => Self::parse_csv(read()?.as_bytes())?,
            other => return Err(CityDataError::UnsupportedFormat(other.to_string())),
        };

        debug!(path = %path.display(), cities = table.len(), "loaded city data");
        Ok(table)
    }

    /// Parses city data from JSON text.
    pub fn parse_json(text: &str) -> Result<CityTable, CityDataError> {
        let root: Value = serde_json::from_str(text)?;
        let Value::Object(cities) = root else {
            return Err(CityDataError::NotAnObject);
        };

        let mut table = CityTable::new();
        for (name, fields) in cities {
            match fields {
                Value::Object(fields) => {
                    table.insert(name.trim(), record_from_json(&name, &fields));
                }
                other => {
                    warn!(city = %name, value = %other, "city entry is not an object; skipping");
                }
            }
        }

        Ok(table)
    }

    /// Parses city data from CSV.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice.
    pub fn parse_csv<R: Read>(reader: R) -> Result<CityTable, CityDataError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut table = CityTable::new();

        for result in csv_reader.deserialize() {
            let row: CityRow = result?;
            let (name, record) = row.into_entry();
            table.insert(name, record);
        }

        Ok(table)
    }
}

fn record_from_json(
    city: &str,
    fields: &Map<String, Value>,
) -> CityRecord {
    let number = |key: &str| json_decimal(city, key, fields.get(key));
    let text = |key: &str| json_text(city, key, fields.get(key));

    CityRecord {
        social_base_min: number("social_security_base_lower_limit"),
        social_base_max: number("social_security_base_upper_limit"),
        fund_base_min: number("housing_fund_base_lower_limit"),
        fund_base_max: number("housing_fund_base_upper_limit"),
        pension_ratio: text("endowment_insurance_ratio"),
        medical_ratio: text("medical_insurance_ratio"),
        unemployment_ratio: text("unemployment_insurance_ratio"),
    }
}

fn json_decimal(
    city: &str,
    field: &str,
    value: Option<&Value>,
) -> Option<Decimal> {
    match value? {
        Value::Null => None,
        Value::Number(n) => {
            let s = n.to_string();
            s.parse::<Decimal>()
                .or_else(|_| Decimal::from_scientific(&s))
                .map_err(|e| warn!(city, field, value = %s, "invalid number: {}", e))
                .ok()
        }
        Value::String(s) => parse_leading_decimal(s),
        other => {
            warn!(city, field, value = %other, "expected a number; ignoring");
            None
        }
    }
}

fn json_text(
    city: &str,
    field: &str,
    value: Option<&Value>,
) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        other => {
            warn!(city, field, value = %other, "expected text; ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use takehome_core::CityDataSource;

    use super::*;

    const TEST_JSON: &str = r#"{
        "北京市": {
            "social_security_base_lower_limit": 7162,
            "social_security_base_upper_limit": 35811,
            "housing_fund_base_lower_limit": "2,540",
            "housing_fund_base_upper_limit": "35811",
            "endowment_insurance_ratio": "8%",
            "medical_insurance_ratio": "2%+3",
            "unemployment_insurance_ratio": "0.5%",
            "employer_pension_ratio": "16%"
        },
        "测试市": {
            "social_security_base_lower_limit": "",
            "endowment_insurance_ratio": 8,
            "medical_insurance_ratio": null
        }
    }"#;

    const TEST_CSV: &str = "city,social_security_base_lower_limit,social_security_base_upper_limit,housing_fund_base_lower_limit,housing_fund_base_upper_limit,endowment_insurance_ratio,medical_insurance_ratio,unemployment_insurance_ratio
上海市,7460,37302,2690,37302,8%,2%,0.5%
测试市,,,,,,,
";

    // =========================================================================
    // JSON tests
    // =========================================================================

    #[test]
    fn parse_json_reads_numbers_and_strings() {
        let table = CityDataLoader::parse_json(TEST_JSON).expect("Failed to parse JSON");

        assert_eq!(
            table.city_record("北京市"),
            Some(&CityRecord {
                social_base_min: Some(dec!(7162)),
                social_base_max: Some(dec!(35811)),
                fund_base_min: Some(dec!(2540)),
                fund_base_max: Some(dec!(35811)),
                pension_ratio: Some("8%".to_string()),
                medical_ratio: Some("2%+3".to_string()),
                unemployment_ratio: Some("0.5%".to_string()),
            })
        );
    }

    #[test]
    fn parse_json_treats_empty_and_null_as_absent() {
        let table = CityDataLoader::parse_json(TEST_JSON).expect("Failed to parse JSON");

        assert_eq!(
            table.city_record("测试市"),
            Some(&CityRecord {
                pension_ratio: Some("8".to_string()),
                ..CityRecord::default()
            })
        );
    }

    #[test]
    fn parse_json_keeps_unit_suffixed_bounds() {
        let json = r#"{"成都市": {
            "social_security_base_lower_limit": "4246元",
            "social_security_base_upper_limit": "21,228 元/月",
            "housing_fund_base_lower_limit": "n/a"
        }}"#;

        let table = CityDataLoader::parse_json(json).expect("Failed to parse JSON");

        assert_eq!(
            table.city_record("成都市"),
            Some(&CityRecord {
                social_base_min: Some(dec!(4246)),
                social_base_max: Some(dec!(21228)),
                ..CityRecord::default()
            })
        );
    }

    #[test]
    fn parse_json_rejects_non_object_root() {
        let result = CityDataLoader::parse_json("[1, 2, 3]");

        assert!(matches!(result, Err(CityDataError::NotAnObject)));
    }

    #[test]
    fn parse_json_reports_syntax_errors() {
        let result = CityDataLoader::parse_json("{ not json");

        assert!(matches!(result, Err(CityDataError::JsonParse(_))));
    }

    #[test]
    fn parse_json_skips_non_object_entries() {
        let table = CityDataLoader::parse_json(r#"{"北京市": "n/a", "上海市": {}}"#)
            .expect("Failed to parse JSON");

        assert_eq!(table.city_names(), vec!["上海市"]);
    }

    // =========================================================================
    // CSV tests
    // =========================================================================

    #[test]
    fn parse_csv_reads_rows() {
        let table = CityDataLoader::parse_csv(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.city_record("上海市"),
            Some(&CityRecord {
                social_base_min: Some(dec!(7460)),
                social_base_max: Some(dec!(37302)),
                fund_base_min: Some(dec!(2690)),
                fund_base_max: Some(dec!(37302)),
                pension_ratio: Some("8%".to_string()),
                medical_ratio: Some("2%".to_string()),
                unemployment_ratio: Some("0.5%".to_string()),
            })
        );
    }

    #[test]
    fn parse_csv_empty_cells_are_absent() {
        let table = CityDataLoader::parse_csv(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(table.city_record("测试市"), Some(&CityRecord::default()));
    }

    #[test]
    fn parse_csv_unparseable_bound_is_absent() {
        let csv = "city,social_security_base_lower_limit\n广州市,about 5000\n";

        let table = CityDataLoader::parse_csv(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(table.city_record("广州市"), Some(&CityRecord::default()));
    }

    #[test]
    fn parse_csv_unit_suffixed_bound_keeps_its_value() {
        let csv = "city,social_security_base_lower_limit,social_security_base_upper_limit\n广州市,5284元,\"26,421 \"\n";

        let table = CityDataLoader::parse_csv(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            table.city_record("广州市"),
            Some(&CityRecord {
                social_base_min: Some(dec!(5284)),
                social_base_max: Some(dec!(26421)),
                ..CityRecord::default()
            })
        );
    }

    #[test]
    fn parse_csv_missing_city_column_is_an_error() {
        let csv = "name,social_security_base_lower_limit\n广州市,5000\n";

        let result = CityDataLoader::parse_csv(csv.as_bytes());

        assert!(matches!(result, Err(CityDataError::CsvParse(_))));
    }

    // =========================================================================
    // load_path tests
    // =========================================================================

    #[test]
    fn load_path_rejects_unknown_extension() {
        let result = CityDataLoader::load_path("cities.yaml");

        assert!(matches!(result, Err(CityDataError::UnsupportedFormat(ext)) if ext == "yaml"));
    }

    #[test]
    fn load_path_reports_missing_file() {
        let result = CityDataLoader::load_path("does-not-exist/cities.json");

        assert!(matches!(result, Err(CityDataError::Io { .. })));
    }
}
