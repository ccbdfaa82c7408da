use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use takehome_core::{BracketTableError, TaxBracket, TaxBracketTable, TaxTables};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading tax bracket data.
#[derive(Debug, Error)]
pub enum TaxBracketLoaderError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Unknown table '{0}' (expected 'annual' or 'monthly_bonus')")]
    UnknownTable(String),

    #[error("Invalid {table} table: {source}")]
    InvalidTable {
        table: &'static str,
        #[source]
        source: BracketTableError,
    },
}

impl From<csv::Error> for TaxBracketLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxBracketLoaderError::CsvParse(err.to_string())
    }
}

const ANNUAL: &str = "annual";
const MONTHLY_BONUS: &str = "monthly_bonus";

/// A single record from the tax brackets CSV file.
///
/// - `table`: `annual` (cumulative withholding) or `monthly_bonus`
///   (separately taxed bonus)
/// - `threshold`: the amount above which this bracket applies
/// - `rate`: the marginal rate as a decimal (e.g. 0.10 for 10%)
/// - `quick_deduction`: the constant subtracted from `amount × rate`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub table: String,
    pub threshold: Decimal,
    pub rate: Decimal,
    pub quick_deduction: Decimal,
}

/// Loader for tax bracket data from CSV files.
///
/// A file may define one or both tables. A table the file does not
/// mention keeps its statutory values.
pub struct TaxBracketLoader;

impl TaxBracketLoader {
    /// Parse tax bracket records from a CSV reader.
    ///
    /// Returns a vector of parsed records. The reader can be any type that
    /// implements `Read`, such as a file or a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, TaxBracketLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Builds validated tables from parsed records.
    ///
    /// Records keep their file order within each table, so the file must
    /// list brackets from the lowest threshold up.
    pub fn tables(records: &[TaxBracketRecord]) -> Result<TaxTables, TaxBracketLoaderError> {
        let mut annual = Vec::new();
        let mut monthly_bonus = Vec::new();

        for record in records {
            let bracket = TaxBracket::new(record.threshold, record.rate, record.quick_deduction);
            match record.table.trim() {
                ANNUAL => annual.push(bracket),
                MONTHLY_BONUS => monthly_bonus.push(bracket),
                other => return Err(TaxBracketLoaderError::UnknownTable(other.to_string())),
            }
        }

        let defaults = TaxTables::default();
        Ok(TaxTables {
            annual: Self::table_or_default(ANNUAL, annual, defaults.annual)?,
            monthly_bonus: Self::table_or_default(MONTHLY_BONUS, monthly_bonus, defaults.monthly_bonus)?,
        })
    }

    /// Reads, parses and validates a bracket CSV file.
    pub fn load_path(path: impl AsRef<Path>) -> Result<TaxTables, TaxBracketLoaderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TaxBracketLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let records = Self::parse(text.as_bytes())?;
        debug!(path = %path.display(), records = records.len(), "parsed bracket file");
        Self::tables(&records)
    }

    fn table_or_default(
        name: &'static str,
        brackets: Vec<TaxBracket>,
        default: TaxBracketTable,
    ) -> Result<TaxBracketTable, TaxBracketLoaderError> {
        if brackets.is_empty() {
            debug!(table = name, "no brackets in file; keeping statutory table");
            return Ok(default);
        }

        info!(table = name, brackets = brackets.len(), "using bracket table from file");
        TaxBracketTable::new(brackets).map_err(|source| TaxBracketLoaderError::InvalidTable {
            table: name,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = r#"table,threshold,rate,quick_deduction
annual,0,0.03,0
annual,36000,0.10,2520
annual,144000,0.20,16920
annual,300000,0.25,31920
annual,420000,0.30,52920
annual,660000,0.35,85920
annual,960000,0.45,181920
monthly_bonus,0,0.03,0
monthly_bonus,3000,0.10,210
monthly_bonus,12000,0.20,1410
monthly_bonus,25000,0.25,2660
monthly_bonus,35000,0.30,4410
monthly_bonus,55000,0.35,7160
monthly_bonus,80000,0.45,15160
"#;

    #[test]
    fn test_parse_csv_single_bracket() {
        let csv = "table,threshold,rate,quick_deduction\nannual,36000,0.10,2520";

        let records = TaxBracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![TaxBracketRecord {
                table: "annual".to_string(),
                threshold: dec!(36000),
                rate: dec!(0.10),
                quick_deduction: dec!(2520),
            }]
        );
    }

    #[test]
    fn test_parse_csv_invalid_decimal() {
        let csv = "table,threshold,rate,quick_deduction\nannual,abc,0.10,0";

        let result = TaxBracketLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(TaxBracketLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_statutory_csv_matches_builtin_tables() {
        let records = TaxBracketLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

        let tables = TaxBracketLoader::tables(&records).expect("tables should validate");

        assert_eq!(tables, TaxTables::default());
    }

    #[test]
    fn test_missing_table_keeps_default() {
        let csv = "table,threshold,rate,quick_deduction\nannual,0,0.05,0\nannual,50000,0.15,5000\n";
        let records = TaxBracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        let tables = TaxBracketLoader::tables(&records).expect("tables should validate");

        assert_eq!(tables.annual.brackets().len(), 2);
        assert_eq!(tables.monthly_bonus, TaxBracketTable::monthly_bonus());
    }

    #[test]
    fn test_unknown_table_is_rejected() {
        let csv = "table,threshold,rate,quick_deduction\nweekly,0,0.03,0\n";
        let records = TaxBracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        let result = TaxBracketLoader::tables(&records);

        assert!(matches!(result, Err(TaxBracketLoaderError::UnknownTable(t)) if t == "weekly"));
    }

    #[test]
    fn test_inconsistent_quick_deduction_is_rejected() {
        let csv = "table,threshold,rate,quick_deduction\nannual,0,0.03,0\nannual,36000,0.10,2000\n";
        let records = TaxBracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        let result = TaxBracketLoader::tables(&records);

        assert!(matches!(
            result,
            Err(TaxBracketLoaderError::InvalidTable {
                table: "annual",
                source: BracketTableError::QuickDeductionMismatch { index: 1, .. },
            })
        ));
    }

    #[test]
    fn test_load_path_missing_file() {
        let result = TaxBracketLoader::load_path("does-not-exist/brackets.csv");

        assert!(matches!(result, Err(TaxBracketLoaderError::Io { .. })));
    }
}
