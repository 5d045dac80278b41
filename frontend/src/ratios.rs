//! Liquidity ratio and USD exposure formulas.
//!
//! The backend recomputes these on save; the preview shown before the save
//! round-trip and the payload sent to it both come from this module.

use std::fmt;

use serde_json::{Map, Value};

use crate::line_items::{LineItem, LineValues, TOTAL_ASSETS, TOTAL_CAPITAL, TOTAL_LIABILITIES};

const STATUTORY_LIQUIDITY: [&str; 5] = ["1010", "1040", "1060", "1078", "1079"];
const DEPOSITS_AND_DEBT: [&str; 4] = ["2180", "2050", "2255", "2295"];
const TOTAL_CASH_LIQUID: &str = "1100";
const BORROWINGS: &str = "2050";
const MEMBER_DEPOSITS: &str = "2180";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ratio {
    Percent(f64),
    /// Denominator was zero.
    NotApplicable,
}

impl Ratio {
    fn of(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            Ratio::NotApplicable
        } else {
            let percent = numerator / denominator * 100.0;
            // no "-0.00%"
            Ratio::Percent(if percent == 0.0 { 0.0 } else { percent })
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Percent(p) => write!(f, "{:.2}%", p),
            Ratio::NotApplicable => f.write_str("N/A"),
        }
    }
}

pub fn statutory_ratio(values: &LineValues) -> Ratio {
    Ratio::of(
        values.sum(&STATUTORY_LIQUIDITY),
        values.sum(&DEPOSITS_AND_DEBT),
    )
}

pub fn core_ratio(values: &LineValues) -> Ratio {
    Ratio::of(
        values.get(TOTAL_CASH_LIQUID) - values.get(BORROWINGS),
        values.get(MEMBER_DEPOSITS),
    )
}

pub fn total_ratio(values: &LineValues) -> Ratio {
    Ratio::of(values.get(TOTAL_CASH_LIQUID), values.get(MEMBER_DEPOSITS))
}

#[derive(Clone, Debug, PartialEq)]
pub struct RatioResult {
    pub reporting_date: String,
    pub statutory: Ratio,
    pub core: Ratio,
    pub total: Ratio,
}

pub fn liquidity_ratios(reporting_date: &str, values: &LineValues) -> RatioResult {
    RatioResult {
        reporting_date: reporting_date.to_string(),
        statutory: statutory_ratio(values),
        core: core_ratio(values),
        total: total_ratio(values),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Long,
    Short,
    Neutral,
}

impl Position {
    pub fn of(amount: f64) -> Self {
        if amount > 0.0 {
            Position::Long
        } else if amount < 0.0 {
            Position::Short
        } else {
            Position::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Position::Long => "Long",
            Position::Short => "Short",
            Position::Neutral => "Neutral",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UsdExposure {
    pub amount: f64,
    pub position: Position,
}

/// Net USD exposure by magnitude: `|assets| - |liabilities| - |capital|`.
pub fn usd_exposure(values: &LineValues) -> UsdExposure {
    let amount = values.get(TOTAL_ASSETS).abs()
        - values.get(TOTAL_LIABILITIES).abs()
        - values.get(TOTAL_CAPITAL).abs();
    UsdExposure {
        amount,
        position: Position::of(amount),
    }
}

/// Save payload: `reporting_date` plus one key per line code; rows without a
/// complete number are sent as `null` so the backend applies its default.
pub fn submission_payload(reporting_date: &str, items: &[LineItem]) -> Value {
    let mut body = Map::new();
    body.insert(
        "reporting_date".to_string(),
        Value::String(reporting_date.to_string()),
    );
    for item in items {
        let value = item
            .number()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null);
        body.insert(item.code.to_string(), value);
    }
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_items::{liquidity_catalog, usd_exposure_catalog};

    fn values(pairs: &[(&str, f64)]) -> LineValues {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn statutory_sums_both_sides() {
        let v = values(&[
            ("1010", 100.0),
            ("1040", 50.0),
            ("1079", 50.0),
            ("2180", 800.0),
            ("2050", 200.0),
        ]);
        assert_eq!(statutory_ratio(&v).to_string(), "20.00%");
    }

    #[test]
    fn core_and_total_use_member_deposits() {
        let v = values(&[("1100", 300.0), ("2050", 100.0), ("2180", 400.0)]);
        assert_eq!(core_ratio(&v).to_string(), "50.00%");
        assert_eq!(total_ratio(&v).to_string(), "75.00%");
    }

    #[test]
    fn zero_denominator_is_not_applicable() {
        let v = values(&[("1010", 100.0), ("1100", 300.0)]);
        assert_eq!(statutory_ratio(&v), Ratio::NotApplicable);
        assert_eq!(core_ratio(&v).to_string(), "N/A");
        assert_eq!(total_ratio(&v).to_string(), "N/A");
    }

    #[test]
    fn zero_numerator_is_a_real_ratio() {
        let v = values(&[("2180", 400.0)]);
        assert_eq!(statutory_ratio(&v).to_string(), "0.00%");
        assert_eq!(total_ratio(&v).to_string(), "0.00%");
    }

    #[test]
    fn denominators_that_cancel_out_are_not_applicable() {
        let v = values(&[("1010", 10.0), ("2180", 50.0), ("2050", -50.0)]);
        assert_eq!(statutory_ratio(&v), Ratio::NotApplicable);
    }

    #[test]
    fn formulas_are_idempotent() {
        let v = values(&[("1010", 1.0), ("1100", 2.0), ("2050", 3.0), ("2180", 7.0)]);
        assert_eq!(liquidity_ratios("2024-06-30", &v), liquidity_ratios("2024-06-30", &v));
    }

    #[test]
    fn rounds_to_two_decimals() {
        let v = values(&[("1100", 1.0), ("2180", 3.0)]);
        assert_eq!(total_ratio(&v).to_string(), "33.33%");
    }

    #[test]
    fn exposure_is_magnitude_based() {
        let long = values(&[
            (TOTAL_ASSETS, 1000.0),
            (TOTAL_LIABILITIES, -600.0),
            (TOTAL_CAPITAL, 100.0),
        ]);
        assert_eq!(
            usd_exposure(&long),
            UsdExposure {
                amount: 300.0,
                position: Position::Long
            }
        );

        let short = values(&[(TOTAL_ASSETS, 100.0), (TOTAL_LIABILITIES, 600.0)]);
        assert_eq!(usd_exposure(&short).position, Position::Short);
        assert_eq!(usd_exposure(&short).amount, -500.0);

        let flat = values(&[(TOTAL_ASSETS, -500.0), (TOTAL_LIABILITIES, 500.0)]);
        assert_eq!(usd_exposure(&flat).position, Position::Neutral);
    }

    #[test]
    fn payload_sends_null_for_blank_rows() {
        let mut items = liquidity_catalog();
        items[0].raw_value = "1234.5".to_string();
        items[1].raw_value = "-".to_string();

        let payload = submission_payload("2024-06-30", &items);
        assert_eq!(payload["reporting_date"], "2024-06-30");
        assert_eq!(payload["1010"], 1234.5);
        assert!(payload["1040"].is_null());
        assert!(payload["2295"].is_null());
        assert_eq!(payload.as_object().map(|o| o.len()), Some(11));
    }

    #[test]
    fn preview_and_payload_read_the_same_rows() {
        let mut items = usd_exposure_catalog();
        items[0].raw_value = "2500".to_string();
        items[1].raw_value = "1000".to_string();

        let preview = usd_exposure(&LineValues::from_items(&items));
        let payload = submission_payload("2024-06-30", &items);
        assert_eq!(preview.amount, 1500.0);
        assert_eq!(payload[TOTAL_ASSETS], 2500.0);
        assert!(payload[TOTAL_CAPITAL].is_null());
    }
}
