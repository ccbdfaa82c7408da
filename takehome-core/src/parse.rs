//! Lenient text-to-number helpers for user and configuration input.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+))").expect("valid leading-number regex")
});

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| ParseDecimalError {
        input: s.to_string(),
        source: e,
    })
}

/// Reads the longest decimal number at the start of `s`, ignoring anything
/// after it: `"1.2.3"` gives 1.2 and `"7460元"` gives 7460.
pub fn leading_decimal(s: &str) -> Option<Decimal> {
    let captures = LEADING_NUMBER.captures(s)?;
    let mut text = captures[1].to_string();
    if text.ends_with('.') {
        text.pop();
    }
    text.parse().ok()
}

/// Reads the numeric prefix of a value that may carry thousands separators
/// or a unit suffix: `"7,460元"` gives 7460 and `"37302 (2024)"` gives 37302.
///
/// Returns `None` for blank input, and with a warning when no number leads
/// the text.
pub fn parse_leading_decimal(s: &str) -> Option<Decimal> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return None;
    }
    let value = leading_decimal(&normalized);
    if value.is_none() {
        tracing::warn!(input = %s, "no leading number");
    }
    value
}
