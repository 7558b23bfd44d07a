mod store;

pub use store::{
    JsonFileStore, MemoryStore, SettingsError, SettingsStore, format_stored, parse_stored,
};

use crate::core::{DividendKind, DividendMode, Inputs};

pub const DEFAULT_SETTINGS_FILE: &str = "equity-swap-settings.json";

pub mod keys {
    pub const EQUITY_SWAP: &str = "equitySwap";
    pub const HOURS_PER_WEEK: &str = "hoursPerWeek";
    pub const WEEKS_PER_YEAR: &str = "weeksPerYear";
    pub const HOURLY_RATE: &str = "hourlyRate";
    pub const SHARE_VALUE: &str = "shareValue";
    pub const OPTION_STRIKE_PRICE: &str = "optionStrikePrice";
    pub const DIVIDEND_PER_SHARE: &str = "dividendPerShare";
    pub const DIVIDEND_RATE: &str = "dividendRate";
    pub const GROWTH_RATE: &str = "growthRate";
}

pub mod defaults {
    pub const EQUITY_SWAP: f64 = 0.0;
    pub const HOURS_PER_WEEK: f64 = 20.0;
    pub const WEEKS_PER_YEAR: f64 = 30.0;
    pub const HOURLY_RATE: f64 = 100.0;
    pub const SHARE_VALUE: f64 = 10.0;
    pub const OPTION_STRIKE_PRICE: f64 = 4.0;
    pub const DIVIDEND_PER_SHARE: f64 = 1.0;
    pub const DIVIDEND_RATE: f64 = 5.0;
    pub const GROWTH_RATE: f64 = 20.0;
}

pub fn load_inputs(store: &dyn SettingsStore, kind: DividendKind) -> Inputs {
    let dividend = match kind {
        DividendKind::Flat => DividendMode::Flat {
            per_share: store.get(keys::DIVIDEND_PER_SHARE, defaults::DIVIDEND_PER_SHARE),
        },
        DividendKind::Rate => DividendMode::RateOfShareValue {
            rate: store.get(keys::DIVIDEND_RATE, defaults::DIVIDEND_RATE),
            growth_rate: store.get(keys::GROWTH_RATE, defaults::GROWTH_RATE),
        },
    };

    Inputs {
        equity_swap_percent: store.get(keys::EQUITY_SWAP, defaults::EQUITY_SWAP),
        hours_per_week: store.get(keys::HOURS_PER_WEEK, defaults::HOURS_PER_WEEK),
        weeks_per_year: store.get(keys::WEEKS_PER_YEAR, defaults::WEEKS_PER_YEAR),
        hourly_rate: store.get(keys::HOURLY_RATE, defaults::HOURLY_RATE),
        share_value: store.get(keys::SHARE_VALUE, defaults::SHARE_VALUE),
        option_strike_price: store.get(keys::OPTION_STRIKE_PRICE, defaults::OPTION_STRIKE_PRICE),
        dividend,
    }
}

/// Writes every key used by the active dividend mode in one store update.
/// Keys of the other mode are left untouched.
pub fn persist_inputs(store: &mut dyn SettingsStore, inputs: &Inputs) -> Result<(), SettingsError> {
    let mut entries = vec![
        (keys::EQUITY_SWAP, inputs.equity_swap_percent),
        (keys::HOURS_PER_WEEK, inputs.hours_per_week),
        (keys::WEEKS_PER_YEAR, inputs.weeks_per_year),
        (keys::HOURLY_RATE, inputs.hourly_rate),
        (keys::SHARE_VALUE, inputs.share_value),
        (keys::OPTION_STRIKE_PRICE, inputs.option_strike_price),
    ];
    match inputs.dividend {
        DividendMode::Flat { per_share } => entries.push((keys::DIVIDEND_PER_SHARE, per_share)),
        DividendMode::RateOfShareValue { rate, growth_rate } => {
            entries.push((keys::DIVIDEND_RATE, rate));
            entries.push((keys::GROWTH_RATE, growth_rate));
        }
    }
    store.set_many(&entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_loads_defaults() {
        let store = MemoryStore::new();
        let inputs = load_inputs(&store, DividendKind::Flat);
        assert_eq!(inputs.equity_swap_percent, 0.0);
        assert_eq!(inputs.hours_per_week, 20.0);
        assert_eq!(inputs.weeks_per_year, 30.0);
        assert_eq!(inputs.hourly_rate, 100.0);
        assert_eq!(inputs.share_value, 10.0);
        assert_eq!(inputs.option_strike_price, 4.0);
        assert_eq!(inputs.dividend, DividendMode::Flat { per_share: 1.0 });

        let inputs = load_inputs(&store, DividendKind::Rate);
        assert_eq!(
            inputs.dividend,
            DividendMode::RateOfShareValue {
                rate: 5.0,
                growth_rate: 20.0
            }
        );
    }

    #[test]
    fn stored_zero_hourly_rate_is_not_replaced_by_default() {
        let store = MemoryStore::new().with_raw(keys::HOURLY_RATE, "0");
        let inputs = load_inputs(&store, DividendKind::Flat);
        assert_eq!(inputs.hourly_rate, 0.0);
    }

    #[test]
    fn persisted_rate_inputs_load_back() {
        let inputs = Inputs {
            equity_swap_percent: 35.0,
            hours_per_week: 32.0,
            weeks_per_year: 40.0,
            hourly_rate: 125.5,
            share_value: 3.2,
            option_strike_price: 0.0,
            dividend: DividendMode::RateOfShareValue {
                rate: 2.5,
                growth_rate: -4.0,
            },
        };
        let mut store = MemoryStore::new();
        persist_inputs(&mut store, &inputs).expect("memory store never fails");

        assert_eq!(load_inputs(&store, DividendKind::Rate), inputs);
        assert_eq!(store.get_raw(keys::DIVIDEND_PER_SHARE), None);
    }

    #[test]
    fn persisted_flat_inputs_reach_the_json_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        let inputs = Inputs {
            equity_swap_percent: 60.0,
            dividend: DividendMode::Flat { per_share: 0.25 },
            ..load_inputs(&MemoryStore::new(), DividendKind::Flat)
        };

        let mut store = JsonFileStore::open(&path);
        persist_inputs(&mut store, &inputs).expect("write settings");

        let reopened = JsonFileStore::open(&path);
        assert_eq!(load_inputs(&reopened, DividendKind::Flat), inputs);
        assert_eq!(reopened.get_raw(keys::GROWTH_RATE), None);
    }
}
