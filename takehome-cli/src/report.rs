use std::fmt;

use anyhow::{Context, Result};
use clap::ValueEnum;
use rust_decimal::Decimal;
use takehome_core::{BonusTaxMode, CityParameters, MonthlyTaxRecord};

use crate::app::Calculation;

/// How the report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned tables for reading in a terminal.
    #[default]
    Text,
    /// The full calculation as pretty-printed JSON.
    Json,
}

/// Renders `calculation` in the requested format.
pub fn render(
    calculation: &Calculation,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(TextReport(calculation).to_string()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(calculation).context("serializing report as JSON")
        }
    }
}

fn money(value: Decimal) -> String {
    format!("{value:.2}")
}

fn percent(ratio: Decimal) -> String {
    format!("{}%", (ratio * Decimal::ONE_HUNDRED).normalize())
}

/// Human-readable report.
pub struct TextReport<'a>(pub &'a Calculation);

impl TextReport<'_> {
    fn write_city(
        f: &mut fmt::Formatter<'_>,
        city: &CityParameters,
    ) -> fmt::Result {
        writeln!(
            f,
            "Social base:        {} - {}",
            money(city.social_base_min),
            money(city.social_base_max)
        )?;
        writeln!(
            f,
            "Fund base:          {} - {}",
            money(city.fund_base_min),
            money(city.fund_base_max)
        )?;
        writeln!(f, "Pension:            {}", percent(city.pension_ratio))?;
        if city.medical_fixed_amount.is_zero() {
            writeln!(f, "Medical:            {}", percent(city.medical_ratio))?;
        } else {
            writeln!(
                f,
                "Medical:            {} + {}",
                percent(city.medical_ratio),
                money(city.medical_fixed_amount)
            )?;
        }
        writeln!(f, "Unemployment:       {}", percent(city.unemployment_ratio))
    }

    fn write_months(
        f: &mut fmt::Formatter<'_>,
        months: &[MonthlyTaxRecord],
    ) -> fmt::Result {
        writeln!(
            f,
            "{:>5} {:>14} {:>14} {:>12} {:>12} {:>6} {:>12}",
            "Month", "Acc. income", "Acc. taxable", "Acc. tax", "Tax", "Rate", "Take-home"
        )?;
        for record in months {
            let marker = if record.has_bonus { "*" } else { " " };
            writeln!(
                f,
                "{:>4}{} {:>14} {:>14} {:>12} {:>12} {:>6} {:>12}",
                record.month,
                marker,
                money(record.accumulated_income),
                money(record.accumulated_taxable_income),
                money(record.accumulated_tax),
                money(record.current_month_tax),
                format!("{}%", record.marginal_rate_pct.normalize()),
                money(record.after_tax_income),
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let calculation = self.0;
        let report = &calculation.report;
        let annual = &report.annual;

        writeln!(f, "City:               {}", calculation.city)?;
        Self::write_city(f, &report.city)?;
        writeln!(f)?;

        writeln!(f, "Social base used:   {}", money(report.social.base))?;
        writeln!(f, "  Pension:          {}", money(report.social.pension))?;
        writeln!(f, "  Medical:          {}", money(report.social.medical))?;
        writeln!(f, "  Unemployment:     {}", money(report.social.unemployment))?;
        writeln!(f, "  Total:            {}", money(report.social.total))?;
        writeln!(f, "Housing fund:       {}", money(report.employee_fund))?;
        writeln!(f, "Employer fund:      {}", money(report.employer_fund))?;
        if !calculation.deductions.is_empty() {
            let keys: Vec<_> = calculation.deductions.iter().map(|d| d.key()).collect();
            writeln!(f, "Deductions:         {}", keys.join(", "))?;
        }
        writeln!(f, "Special deduction:  {}", money(annual.special_deduction / Decimal::from(12)))?;
        writeln!(f)?;

        if !report.bonus.after_tax.is_zero() || !report.bonus.tax.is_zero() {
            match report.bonus_mode {
                BonusTaxMode::Separate => writeln!(
                    f,
                    "Bonus (separate, month {}): tax {} at {}% less {}, take-home {}",
                    report.bonus_month.get(),
                    money(report.bonus.tax),
                    report.bonus.rate_pct.normalize(),
                    money(report.bonus.quick_deduction),
                    money(report.bonus.after_tax)
                )?,
                BonusTaxMode::Combined => writeln!(
                    f,
                    "Bonus (combined, month {}): {} added to that month's income",
                    report.bonus_month.get(),
                    money(report.bonus.after_tax)
                )?,
            }
            writeln!(f)?;
        }

        Self::write_months(f, &report.months)?;
        writeln!(f)?;

        writeln!(f, "Annual pre-tax:     {}", money(annual.pre_tax))?;
        writeln!(f, "Social insurance:   {}", money(annual.social_personal))?;
        writeln!(f, "Housing fund:       {}", money(annual.fund_personal))?;
        writeln!(f, "Taxable income:     {}", money(annual.taxable_income))?;
        writeln!(
            f,
            "Salary tax:         {} ({}%, quick deduction {})",
            money(annual.salary_tax),
            annual.marginal_rate_pct.normalize(),
            money(annual.quick_deduction)
        )?;
        writeln!(f, "Bonus tax:          {}", money(annual.bonus_tax))?;
        writeln!(f, "Total tax:          {}", money(annual.total_tax))?;
        writeln!(f, "Take-home:          {}", money(annual.after_tax))?;
        write!(f, "Incl. both funds:   {}", money(annual.total_income))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use takehome_core::calculations::PayrollCalculator;
    use takehome_core::{DeductionSelection, PayrollInput};

    use super::*;

    fn calculation(input: PayrollInput) -> Calculation {
        Calculation {
            city: "上海市".to_string(),
            deductions: DeductionSelection::new(),
            report: PayrollCalculator::default().calculate(&input, &CityParameters::default()),
        }
    }

    #[test]
    fn money_always_has_two_places() {
        assert_eq!(money(dec!(1053)), "1053.00");
        assert_eq!(money(dec!(97.4)), "97.40");
    }

    #[test]
    fn percent_drops_trailing_zeros() {
        assert_eq!(percent(dec!(0.080)), "8%");
        assert_eq!(percent(dec!(0.005)), "0.5%");
    }

    #[test]
    fn text_report_lists_every_month() {
        let text = TextReport(&calculation(PayrollInput {
            monthly_salary: dec!(20000),
            ..PayrollInput::default()
        }))
        .to_string();

        for month in 1..=12 {
            assert!(text.lines().any(|line| line.trim_start().starts_with(&month.to_string())));
        }
        assert!(text.contains("City:               上海市"));
        assert!(!text.contains("Bonus ("));
    }

    #[test]
    fn text_report_marks_bonus_month() {
        let text = TextReport(&calculation(PayrollInput {
            monthly_salary: dec!(20000),
            year_bonus: dec!(60000),
            bonus_month: takehome_core::BonusMonth::new(6),
            ..PayrollInput::default()
        }))
        .to_string();

        assert!(text.contains("Bonus (separate, month 6)"));
        assert!(text.lines().any(|line| line.starts_with("   6*")));
    }

    #[test]
    fn json_report_round_trips_totals() {
        let calc = calculation(PayrollInput {
            monthly_salary: dec!(20000),
            ..PayrollInput::default()
        });

        let json = render(&calc, OutputFormat::Json).expect("JSON rendering should succeed");
        let value: serde_json::Value = serde_json::from_str(&json).expect("output should be JSON");

        assert_eq!(value["city"], "上海市");
        assert_eq!(value["report"]["months"].as_array().map(Vec::len), Some(12));
        assert_eq!(
            value["report"]["annual"]["total_tax"],
            serde_json::Value::String(calc.report.annual.total_tax.to_string())
        );
    }
}
