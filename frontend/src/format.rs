use chrono::NaiveDate;

use crate::numeric_input::to_display;

/// `1234567.891` → `1,234,567.89`
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    // no "-0.00"
    let fixed = match fixed.strip_prefix('-') {
        Some(unsigned) if unsigned.chars().all(|c| c == '0' || c == '.') => unsigned.to_string(),
        _ => fixed,
    };
    to_display(&fixed)
}

pub fn format_optional_amount(value: Option<f64>) -> String {
    value.map(format_amount).unwrap_or_else(|| "N/A".to_string())
}

pub fn format_currency(value: f64, currency: &str) -> String {
    format!("{} {}", format_amount(value), currency)
}

pub fn format_percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}%", v))
        .unwrap_or_else(|| "N/A".to_string())
}

/// `2024-03-15T14:02:26.123Z` → `2024-03-15 14:02`
pub fn format_timestamp(raw: &str) -> String {
    match raw.split_once('T') {
        Some((date, time)) => {
            let hhmm: String = time.chars().take(5).collect();
            format!("{} {}", date, hhmm)
        }
        None => raw.to_string(),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_grouped_with_two_decimals() {
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(-1500.0), "-1,500.00");
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_currency(2500.5, "USD"), "2,500.50 USD");
        assert_eq!(format_optional_amount(None), "N/A");
    }

    #[test]
    fn amounts_rounding_to_zero_lose_their_sign() {
        assert_eq!(format_amount(-0.001), "0.00");
        assert_eq!(format_amount(-0.0), "0.00");
        assert_eq!(format_amount(-0.005001), "-0.01");
    }

    #[test]
    fn percent_and_timestamps() {
        assert_eq!(format_percent(Some(12.3456)), "12.35%");
        assert_eq!(format_percent(None), "N/A");
        assert_eq!(format_timestamp("2024-03-15T14:02:26.123Z"), "2024-03-15 14:02");
        assert_eq!(format_timestamp("2024-03-15"), "2024-03-15");
    }
}
