use serde::Serialize;

/// Last year of the projection; the series covers years `0..=PROJECTION_LAST_YEAR`.
pub const PROJECTION_LAST_YEAR: u32 = 20;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DividendKind {
    Flat,
    Rate,
}

/// How dividends are paid on vested options.
///
/// Percent fields are held as entered, e.g. `5.0` means 5% per year.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DividendMode {
    /// Fixed currency amount per share per year. No projection series.
    Flat { per_share: f64 },
    /// Percentage of current share value per year, with share value growing
    /// at `growth_rate` percent per year over the projection.
    RateOfShareValue { rate: f64, growth_rate: f64 },
}

impl DividendMode {
    pub fn kind(self) -> DividendKind {
        match self {
            DividendMode::Flat { .. } => DividendKind::Flat,
            DividendMode::RateOfShareValue { .. } => DividendKind::Rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub equity_swap_percent: f64,
    pub hours_per_week: f64,
    pub weeks_per_year: f64,
    pub hourly_rate: f64,
    pub share_value: f64,
    pub option_strike_price: f64,
    pub dividend: DividendMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_hours: f64,
    pub max_annual_billing: f64,
    pub cash: f64,
    pub equity_value: f64,
    pub vested_options: f64,
    pub cash_bonus: f64,
    pub annual_dividend: f64,
    pub total_cash: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionYear {
    pub year: u32,
    pub all_cash_value: f64,
    pub reduced_cash_value: f64,
    pub cumulative_shares: f64,
    pub current_share_value: f64,
    pub dividend_value: f64,
    pub equity_total: f64,
    pub difference: f64,
}

pub type ProjectionSeries = Vec<ProjectionYear>;

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub summary: Summary,
    /// Present only for [`DividendMode::RateOfShareValue`].
    pub series: Option<ProjectionSeries>,
}
