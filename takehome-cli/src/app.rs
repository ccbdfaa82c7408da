use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use takehome_core::calculations::{CityParameterResolver, PayrollCalculator};
use takehome_core::{CityTable, DeductionSelection, PayrollReport, TaxTables};
use takehome_data::{CityDataLoader, TaxBracketLoader};
use tracing::{debug, info};

use crate::config::Scenario;

/// City parameters shipped with the binary, used when no file is given.
const BUNDLED_CITIES: &str = include_str!("../data/cities.json");

/// Label shown for the user-configured city.
pub const CUSTOM_CITY_LABEL: &str = "custom";

/// A finished calculation together with what it was computed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Calculation {
    /// Canonical name of the city whose data was used.
    pub city: String,
    pub deductions: DeductionSelection,
    pub report: PayrollReport,
}

/// Loads city parameters from `path`, or the bundled set when `None`.
pub fn load_cities(path: Option<&Path>) -> Result<CityTable> {
    let cities = match path {
        Some(path) => CityDataLoader::load_path(path)
            .with_context(|| format!("loading city data from '{}'", path.display()))?,
        None => CityDataLoader::parse_json(BUNDLED_CITIES).context("parsing bundled city data")?,
    };
    debug!(cities = cities.len(), "city data loaded");
    Ok(cities)
}

/// Loads tax bracket tables from `path`, or the statutory tables when `None`.
pub fn load_tables(path: Option<&Path>) -> Result<TaxTables> {
    match path {
        Some(path) => TaxBracketLoader::load_path(path)
            .with_context(|| format!("loading tax brackets from '{}'", path.display())),
        None => Ok(TaxTables::default()),
    }
}

/// Runs the full calculation for `scenario` against already loaded data.
pub fn calculate(
    scenario: &Scenario,
    cities: &CityTable,
    tables: TaxTables,
) -> Calculation {
    let resolver = CityParameterResolver::new(cities);
    let params = resolver.resolve(&scenario.city, &scenario.custom);
    let city = resolver
        .resolved_name(&scenario.city)
        .unwrap_or(CUSTOM_CITY_LABEL)
        .to_string();

    let report = PayrollCalculator::new(tables).calculate(&scenario.input, &params);
    info!(
        city = %city,
        salary = %scenario.input.monthly_salary,
        after_tax = %report.annual.after_tax,
        "calculation finished"
    );

    Calculation {
        city,
        deductions: scenario.deductions.clone(),
        report,
    }
}

/// Loads the data files named by `scenario` and calculates.
pub fn run(scenario: &Scenario) -> Result<Calculation> {
    let cities = load_cities(scenario.cities_file.as_deref())?;
    let tables = load_tables(scenario.brackets_file.as_deref())?;
    Ok(calculate(scenario, &cities, tables))
}
