use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rust_decimal::Decimal;
use tracing::debug;

use takehome_cli::config::{CustomSection, ScenarioConfig};
use takehome_cli::report::{self, OutputFormat};
use takehome_cli::{app, logging};
use takehome_core::parse::parse_decimal;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Take-home pay calculator for salaried employees in mainland China.
///
/// Works out social insurance, housing fund and cumulative withholding
/// income tax month by month, taxes the year-end bonus separately or
/// together with salary, and prints the yearly totals.
///
/// Values may come from a TOML scenario file; flags override it.
#[derive(Debug, Parser)]
#[command(name = "takehome", version)]
struct Cli {
    /// TOML scenario file.
    #[arg(long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// City data file (.json or .csv). Defaults to the bundled data.
    #[arg(long = "cities", value_name = "FILE")]
    cities_file: Option<PathBuf>,

    /// Tax bracket CSV. Defaults to the statutory tables.
    #[arg(long = "brackets", value_name = "FILE")]
    brackets_file: Option<PathBuf>,

    /// City identifier (e.g. `beijing`, `上海市`, or `custom`).
    #[arg(long)]
    city: Option<String>,

    /// Monthly pre-tax salary.
    #[arg(long, value_parser = parse_decimal)]
    salary: Option<Decimal>,

    /// Monthly special additional deduction amount.
    #[arg(long, value_parser = parse_decimal, conflicts_with = "deductions")]
    special_deduction: Option<Decimal>,

    /// Deduction category key; repeat for several
    /// (rent, loan_100, loan_50, elder, elder_share, children_100,
    /// children_50, baby_100, baby_50).
    #[arg(long = "deduction", value_name = "KEY")]
    deductions: Vec<String>,

    /// Social insurance base. Defaults to the salary.
    #[arg(long, value_parser = parse_decimal)]
    social_base: Option<Decimal>,

    /// Housing fund base. Defaults to the salary.
    #[arg(long, value_parser = parse_decimal)]
    fund_base: Option<Decimal>,

    /// Employee housing fund ratio in percent (default 7).
    #[arg(long, value_name = "PCT", value_parser = parse_decimal)]
    fund_ratio: Option<Decimal>,

    /// Employer housing fund ratio in percent (default 7).
    #[arg(long, value_name = "PCT", value_parser = parse_decimal)]
    employer_fund_ratio: Option<Decimal>,

    /// Year-end bonus amount.
    #[arg(long, value_parser = parse_decimal, conflicts_with = "bonus_months")]
    bonus: Option<Decimal>,

    /// Year-end bonus as a number of monthly salaries.
    #[arg(long, value_name = "N")]
    bonus_months: Option<u32>,

    /// Month the bonus is paid in (1-12, default 12).
    #[arg(long, value_name = "M", allow_negative_numbers = true)]
    bonus_month: Option<i64>,

    /// Bonus taxation: `separate` or `combine`.
    #[arg(long, value_name = "MODE")]
    bonus_mode: Option<String>,

    /// Pension ratio in percent for the custom city.
    #[arg(long, value_name = "PCT", value_parser = parse_decimal)]
    pension_ratio: Option<Decimal>,

    /// Medical ratio in percent for the custom city.
    #[arg(long, value_name = "PCT", value_parser = parse_decimal)]
    medical_ratio: Option<Decimal>,

    /// Unemployment ratio in percent for the custom city.
    #[arg(long, value_name = "PCT", value_parser = parse_decimal)]
    unemployment_ratio: Option<Decimal>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::default())]
    format: OutputFormat,

    /// Log filter: a level (`warn`, `debug`, ...) or an EnvFilter directive.
    /// Overrides `RUST_LOG`.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// The flags as a scenario layer; unset flags stay `None`.
    fn overrides(&self) -> ScenarioConfig {
        ScenarioConfig {
            city: self.city.clone(),
            salary: self.salary,
            special_deduction: self.special_deduction,
            deductions: (!self.deductions.is_empty()).then(|| self.deductions.clone()),
            social_base: self.social_base,
            fund_base: self.fund_base,
            fund_ratio: self.fund_ratio,
            employer_fund_ratio: self.employer_fund_ratio,
            bonus: self.bonus,
            bonus_months: self.bonus_months,
            bonus_month: self.bonus_month,
            bonus_mode: self.bonus_mode.clone(),
            cities_file: self.cities_file.clone(),
            brackets_file: self.brackets_file.clone(),
            custom: CustomSection {
                pension: self.pension_ratio,
                medical: self.medical_ratio,
                unemployment: self.unemployment_ratio,
            },
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let base = match &cli.scenario {
        Some(path) => ScenarioConfig::load(path)
            .with_context(|| format!("loading scenario '{}'", path.display()))?,
        None => ScenarioConfig::default(),
    };
    let scenario = base.merge(cli.overrides()).resolve()?;
    debug!(city = %scenario.city, "scenario resolved");

    let calculation = app::run(&scenario)?;
    println!("{}", report::render(&calculation, cli.format)?);

    Ok(())
}
