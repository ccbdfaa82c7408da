//! Integration tests: loaded city and bracket files driving the calculation engine.

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use takehome_core::calculations::{CityParameterResolver, PayrollCalculator};
use takehome_core::{CityDataSource, CityParameters, CustomRatios, PayrollInput, TaxTables};
use takehome_data::{CityDataLoader, TaxBracketLoader};

const TEST_CITIES_JSON: &str = include_str!("../test-data/cities.json");
const TEST_CITIES_CSV: &str = include_str!("../test-data/cities.csv");
const TEST_BRACKETS_CSV: &str = include_str!("../test-data/tax_brackets.csv");

#[test]
fn test_json_and_csv_agree_on_shared_cities() {
    let from_json = CityDataLoader::parse_json(TEST_CITIES_JSON).expect("Failed to parse JSON");
    let from_csv =
        CityDataLoader::parse_csv(TEST_CITIES_CSV.as_bytes()).expect("Failed to parse CSV");

    for name in from_csv.city_names() {
        assert_eq!(from_json.city_record(name), from_csv.city_record(name), "{name}");
    }
}

#[test]
fn test_resolve_loaded_city() {
    let cities = CityDataLoader::parse_json(TEST_CITIES_JSON).expect("Failed to parse JSON");
    let resolver = CityParameterResolver::new(&cities);

    let guangzhou = resolver.resolve("guangzhou", &CustomRatios::default());

    assert_eq!(
        guangzhou,
        CityParameters {
            social_base_min: dec!(5284),
            social_base_max: dec!(26421),
            fund_base_min: dec!(2300),
            fund_base_max: dec!(38082),
            pension_ratio: dec!(0.08),
            medical_ratio: dec!(0.02),
            medical_fixed_amount: dec!(0),
            unemployment_ratio: dec!(0.002),
        }
    );
}

#[test]
fn test_blank_city_record_resolves_to_defaults() {
    let cities =
        CityDataLoader::parse_csv(TEST_CITIES_CSV.as_bytes()).expect("Failed to parse CSV");

    let lasa = CityParameterResolver::new(&cities).resolve("lasa", &CustomRatios::default());

    assert_eq!(lasa, CityParameters::default());
}

#[test]
fn test_loaded_brackets_match_statutory_tables() {
    let records =
        TaxBracketLoader::parse(TEST_BRACKETS_CSV.as_bytes()).expect("Failed to parse CSV");

    let tables = TaxBracketLoader::tables(&records).expect("tables should validate");

    assert_eq!(records.len(), 14);
    assert_eq!(tables, TaxTables::default());
}

#[test]
fn test_full_calculation_from_loaded_files() {
    let cities = CityDataLoader::parse_json(TEST_CITIES_JSON).expect("Failed to parse JSON");
    let records =
        TaxBracketLoader::parse(TEST_BRACKETS_CSV.as_bytes()).expect("Failed to parse CSV");
    let tables = TaxBracketLoader::tables(&records).expect("tables should validate");
    let city = CityParameterResolver::new(&cities).resolve("beijing", &CustomRatios::default());

    let report = PayrollCalculator::new(tables).calculate(
        &PayrollInput {
            monthly_salary: dec!(10000),
            year_bonus: dec!(36000),
            ..PayrollInput::default()
        },
        &city,
    );

    // Social 800 + 203 + 50, fund 700: taxable 10000 − 1753 − 5000 = 3247 a month.
    assert_eq!(report.social.total, dec!(1053.00));
    assert_eq!(report.employee_fund, dec!(700.00));
    assert_eq!(report.months[0].accumulated_taxable_income, dec!(3247.00));
    assert_eq!(report.months[0].current_month_tax, dec!(97.41));
    assert_eq!(report.bonus.tax, dec!(1080.00));
}
