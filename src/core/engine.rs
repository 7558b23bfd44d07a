use super::error::EngineError;
use super::types::{
    DividendMode, Inputs, PROJECTION_LAST_YEAR, Projection, ProjectionSeries, ProjectionYear,
    Summary,
};

/// Rounds a monetary amount or option count to the nearest whole unit.
///
/// Ties go away from zero: `2.5 -> 3`, `-2.5 -> -3`.
pub fn round_whole(value: f64) -> f64 {
    value.round()
}

pub fn project(inputs: &Inputs) -> Result<Projection, EngineError> {
    let summary = summarize(inputs)?;
    let series = match inputs.dividend {
        DividendMode::Flat { .. } => None,
        DividendMode::RateOfShareValue { rate, growth_rate } => Some(project_series(
            inputs.share_value,
            &summary,
            rate,
            growth_rate,
        )),
    };
    Ok(Projection { summary, series })
}

pub fn summarize(inputs: &Inputs) -> Result<Summary, EngineError> {
    validate(inputs)?;

    let total_hours = inputs.hours_per_week * inputs.weeks_per_year;
    let max_annual_billing = total_hours * inputs.hourly_rate;

    let cash = round_whole(max_annual_billing * (1.0 - inputs.equity_swap_percent / 100.0));
    let equity_value = max_annual_billing * (inputs.equity_swap_percent / 100.0);

    let vested_options = round_whole(equity_value / inputs.share_value);
    // The bonus covers the cost of exercising every vested option.
    let cash_bonus = round_whole(vested_options * inputs.option_strike_price);

    let annual_dividend = match inputs.dividend {
        DividendMode::Flat { per_share } => round_whole(vested_options * per_share),
        DividendMode::RateOfShareValue { rate, .. } => {
            round_whole(vested_options * inputs.share_value * rate / 100.0)
        }
    };

    Ok(Summary {
        total_hours,
        max_annual_billing,
        cash,
        equity_value,
        vested_options,
        cash_bonus,
        annual_dividend,
        total_cash: cash + cash_bonus + annual_dividend,
    })
}

/// Projects years `0..=PROJECTION_LAST_YEAR`.
///
/// Every year adds another grant of `summary.vested_options`; there is no
/// vesting schedule or dilution.
pub fn project_series(
    share_value: f64,
    summary: &Summary,
    dividend_rate: f64,
    growth_rate: f64,
) -> ProjectionSeries {
    let all_cash_value = summary.max_annual_billing;
    let reduced_cash_value = summary.cash + summary.cash_bonus;
    let growth_factor = 1.0 + growth_rate / 100.0;

    let mut series = Vec::with_capacity(PROJECTION_LAST_YEAR as usize + 1);
    let mut cumulative_shares = 0.0;
    for year in 0..=PROJECTION_LAST_YEAR {
        cumulative_shares += summary.vested_options;
        let current_share_value = share_value * growth_factor.powi(year as i32);
        let dividend_value =
            round_whole(cumulative_shares * current_share_value * dividend_rate / 100.0);
        let equity_total = reduced_cash_value + dividend_value;

        series.push(ProjectionYear {
            year,
            all_cash_value,
            reduced_cash_value,
            cumulative_shares,
            current_share_value,
            dividend_value,
            equity_total,
            difference: equity_total - all_cash_value,
        });
    }
    series
}

fn validate(inputs: &Inputs) -> Result<(), EngineError> {
    let mut fields = vec![
        ("equitySwap", inputs.equity_swap_percent),
        ("hoursPerWeek", inputs.hours_per_week),
        ("weeksPerYear", inputs.weeks_per_year),
        ("hourlyRate", inputs.hourly_rate),
        ("shareValue", inputs.share_value),
        ("optionStrikePrice", inputs.option_strike_price),
    ];
    match inputs.dividend {
        DividendMode::Flat { per_share } => fields.push(("dividendPerShare", per_share)),
        DividendMode::RateOfShareValue { rate, growth_rate } => {
            fields.push(("dividendRate", rate));
            fields.push(("growthRate", growth_rate));
        }
    }

    for (field, value) in fields {
        if !value.is_finite() {
            return Err(EngineError::non_finite(field, value));
        }
    }
    if inputs.share_value == 0.0 {
        return Err(EngineError::zero("shareValue"));
    }
    Ok(())
}
