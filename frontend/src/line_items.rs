use std::collections::HashMap;

/// One row of a fixed financial input form. Only `raw_value` ever changes;
/// it holds the canonical (separator-free) numeric string or is empty.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem {
    pub code: &'static str,
    pub description: &'static str,
    pub raw_value: String,
}

impl LineItem {
    const fn blank(code: &'static str, description: &'static str) -> Self {
        Self {
            code,
            description,
            raw_value: String::new(),
        }
    }

    /// Numeric value, if the row holds a complete number.
    pub fn number(&self) -> Option<f64> {
        let raw = self.raw_value.trim();
        if raw.is_empty() || raw == "-" || raw == "." || raw == "-." {
            return None;
        }
        raw.parse::<f64>().ok()
    }
}

pub fn liquidity_catalog() -> Vec<LineItem> {
    vec![
        LineItem::blank("1010", "Cash"),
        LineItem::blank("1040", "MLP Deposits HQLA1 Govt Bonds"),
        LineItem::blank("1060", "SDebt Security Instruments"),
        LineItem::blank("1078", "MLP Deposits HQLA1 CMB/MBS"),
        LineItem::blank("1079", "MLP Deposits HQLA2B"),
        LineItem::blank("1100", "Total Assets"),
        LineItem::blank("2050", "Borrowings"),
        LineItem::blank("2180", "Member Deposits"),
        LineItem::blank("2255", ""),
        LineItem::blank("2295", ""),
    ]
}

pub const TOTAL_ASSETS: &str = "totalAssets";
pub const TOTAL_LIABILITIES: &str = "totalLiabilities";
pub const TOTAL_CAPITAL: &str = "totalCapital";

pub fn usd_exposure_catalog() -> Vec<LineItem> {
    vec![
        LineItem::blank(TOTAL_ASSETS, "Total Assets"),
        LineItem::blank(TOTAL_LIABILITIES, "Total Liabilities"),
        LineItem::blank(TOTAL_CAPITAL, "Total Capital"),
    ]
}

/// Code → value map the formulas read from. Absent codes read as 0.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineValues(HashMap<String, f64>);

impl LineValues {
    pub fn from_items(items: &[LineItem]) -> Self {
        Self(
            items
                .iter()
                .map(|item| (item.code.to_string(), item.number().unwrap_or(0.0)))
                .collect(),
        )
    }

    pub fn get(&self, code: &str) -> f64 {
        self.0.get(code).copied().unwrap_or(0.0)
    }

    pub fn sum(&self, codes: &[&str]) -> f64 {
        codes.iter().map(|code| self.get(code)).sum()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for LineValues {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_are_fixed_and_ordered() {
        let codes: Vec<_> = liquidity_catalog().iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec!["1010", "1040", "1060", "1078", "1079", "1100", "2050", "2180", "2255", "2295"]
        );
        assert_eq!(usd_exposure_catalog().len(), 3);
    }

    #[test]
    fn incomplete_values_read_as_zero() {
        let mut items = liquidity_catalog();
        items[0].raw_value = "1500.25".to_string();
        items[1].raw_value = "-".to_string();
        items[2].raw_value = ".".to_string();
        items[3].raw_value = "-.5".to_string();

        let values = LineValues::from_items(&items);
        assert_eq!(values.get("1010"), 1500.25);
        assert_eq!(values.get("1040"), 0.0);
        assert_eq!(values.get("1060"), 0.0);
        assert_eq!(values.get("1078"), -0.5);
        assert_eq!(values.get("9999"), 0.0);
    }
}
