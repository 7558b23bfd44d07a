//! Display strings for the summary panel and yearly table.

use super::engine::round_whole;

/// Rounds to a whole number and groups digits in threes: `1234567.4 -> "1,234,567"`.
pub fn group_thousands(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let rounded = round_whole(value);
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn currency(value: f64) -> String {
    format!("${}", group_thousands(value))
}

pub fn per_year(value: f64) -> String {
    format!("{} / year", currency(value))
}

/// Percentages are shown as entered, without rounding.
pub fn percent(value: f64) -> String {
    format!("{value}%")
}
