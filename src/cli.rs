use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, error};

use crate::core::{DividendKind, DividendMode, Inputs, Projection, format, project};
use crate::settings::{
    DEFAULT_SETTINGS_FILE, JsonFileStore, SettingsStore, load_inputs, persist_inputs,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliDividendMode {
    Flat,
    Rate,
}

impl From<CliDividendMode> for DividendKind {
    fn from(value: CliDividendMode) -> Self {
        match value {
            CliDividendMode::Flat => DividendKind::Flat,
            CliDividendMode::Rate => DividendKind::Rate,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "equity-swap",
    about = "Compare all-cash billing against swapping part of it for stock options"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the calculator page and JSON API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
        #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
        settings_file: PathBuf,
    },
    /// Print the summary and, in rate mode, the yearly projection
    Calc(CalcArgs),
}

/// Omitted inputs come from the settings file, then the built-in defaults.
#[derive(Args, Debug)]
pub struct CalcArgs {
    #[arg(
        long,
        value_enum,
        default_value_t = CliDividendMode::Rate,
        help = "Dividend model: flat amount per share, or percent of share value with projection"
    )]
    pub mode: CliDividendMode,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Percent of billing swapped for equity, e.g. 50"
    )]
    pub equity_swap: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub hours_per_week: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub weeks_per_year: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub hourly_rate: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub share_value: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub option_strike_price: Option<f64>,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Flat dividend per share per year, used with --mode flat"
    )]
    pub dividend_per_share: Option<f64>,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Dividend as percent of share value, used with --mode rate"
    )]
    pub dividend_rate: Option<f64>,
    #[arg(
        long,
        allow_negative_numbers = true,
        help = "Annual share value growth in percent, used with --mode rate"
    )]
    pub growth_rate: Option<f64>,
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    pub settings_file: PathBuf,
    #[arg(long, help = "Do not write the inputs back to the settings file")]
    pub no_save: bool,
}

pub fn build_inputs(args: &CalcArgs, store: &dyn SettingsStore) -> Inputs {
    let mut inputs = load_inputs(store, args.mode.into());

    let overrides = [
        (args.equity_swap, &mut inputs.equity_swap_percent),
        (args.hours_per_week, &mut inputs.hours_per_week),
        (args.weeks_per_year, &mut inputs.weeks_per_year),
        (args.hourly_rate, &mut inputs.hourly_rate),
        (args.share_value, &mut inputs.share_value),
        (args.option_strike_price, &mut inputs.option_strike_price),
    ];
    for (value, slot) in overrides {
        if let Some(v) = value {
            *slot = v;
        }
    }

    match &mut inputs.dividend {
        DividendMode::Flat { per_share } => {
            if let Some(v) = args.dividend_per_share {
                *per_share = v;
            }
        }
        DividendMode::RateOfShareValue { rate, growth_rate } => {
            if let Some(v) = args.dividend_rate {
                *rate = v;
            }
            if let Some(v) = args.growth_rate {
                *growth_rate = v;
            }
        }
    }
    inputs
}

pub fn run_calc(args: &CalcArgs) -> Result<String, String> {
    let mut store = JsonFileStore::open(&args.settings_file);
    let inputs = build_inputs(args, &store);
    debug!(?inputs, "resolved calculator inputs");

    let projection = project(&inputs).map_err(|e| e.to_string())?;

    if !args.no_save {
        if let Err(e) = persist_inputs(&mut store, &inputs) {
            error!(error = %e, "failed to persist calculator inputs");
        }
    }
    Ok(render_report(&inputs, &projection))
}

pub fn render_report(inputs: &Inputs, projection: &Projection) -> String {
    let summary = &projection.summary;
    let mut out = String::new();

    let rows = [
        ("Equity swap", format::percent(inputs.equity_swap_percent)),
        ("Vested options", format::group_thousands(summary.vested_options)),
        ("Cash", format::per_year(summary.cash)),
        (
            "Cash bonus to exercise options",
            format::per_year(summary.cash_bonus),
        ),
        ("Annual dividend", format::per_year(summary.annual_dividend)),
        ("Total cash", format::per_year(summary.total_cash)),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<32}{value:>20}");
    }

    if let Some(series) = &projection.series {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:>4}  {:>12}  {:>12}  {:>10}  {:>11}  {:>12}  {:>13}  {:>12}",
            "Year",
            "All cash",
            "Cash+bonus",
            "Shares",
            "Share value",
            "Dividends",
            "Cash+equity",
            "Difference"
        );
        for year in series {
            let _ = writeln!(
                out,
                "{:>4}  {:>12}  {:>12}  {:>10}  {:>11}  {:>12}  {:>13}  {:>12}",
                year.year,
                format::currency(year.all_cash_value),
                format::currency(year.reduced_cash_value),
                format::group_thousands(year.cumulative_shares),
                format!("${:.2}", year.current_share_value),
                format::currency(year.dividend_value),
                format::currency(year.equity_total),
                format::currency(year.difference),
            );
        }
    }
    out
}
