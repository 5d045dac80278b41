//! Trailing-year window over dated records.

use chrono::{Months, NaiveDate};

/// Parses the calendar date of a backend date/datetime string
/// (`2024-06-01` or `2024-06-01T00:00:00Z`). Only the date part counts, so
/// no timezone can shift the day.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split('T').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Start of the window ending at `latest`: the same day one year earlier.
/// A leap day rolls back to Feb 28.
pub fn one_year_before(latest: NaiveDate) -> NaiveDate {
    latest
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN)
}

/// Keeps the records dated within one year of the latest one, both ends
/// inclusive, sorted by date ascending. Records without a parsable date are
/// dropped. Returns the anchor (latest date) alongside.
pub fn filter_trailing_year<T, F>(records: Vec<T>, date_of: F) -> (Vec<T>, Option<NaiveDate>)
where
    F: Fn(&T) -> Option<&str>,
{
    let mut dated: Vec<(NaiveDate, T)> = records
        .into_iter()
        .filter_map(|record| {
            let date = date_of(&record).and_then(parse_calendar_date)?;
            Some((date, record))
        })
        .collect();

    let Some(latest) = dated.iter().map(|(date, _)| *date).max() else {
        return (Vec::new(), None);
    };
    let cutoff = one_year_before(latest);

    dated.retain(|(date, _)| *date >= cutoff && *date <= latest);
    dated.sort_by_key(|(date, _)| *date);
    (dated.into_iter().map(|(_, record)| record).collect(), Some(latest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dates(records: &[&str]) -> Vec<String> {
        records.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keeps_last_year_only() {
        let records = dates(&["2023-01-01", "2023-06-01", "2024-01-01", "2024-06-01"]);
        let (kept, anchor) = filter_trailing_year(records, |r| Some(r.as_str()));
        assert_eq!(anchor, Some(date(2024, 6, 1)));
        // 2023-06-01 is exactly one year before the anchor and stays.
        assert_eq!(kept, dates(&["2023-06-01", "2024-01-01", "2024-06-01"]));
    }

    #[test]
    fn excludes_the_day_before_the_boundary() {
        let records = dates(&["2023-05-31", "2024-01-01", "2024-06-01"]);
        let (kept, _) = filter_trailing_year(records, |r| Some(r.as_str()));
        assert_eq!(kept, dates(&["2024-01-01", "2024-06-01"]));
    }

    #[test]
    fn drops_missing_and_unparsable_dates() {
        let records = vec![
            (1, Some("2024-03-01")),
            (2, None),
            (3, Some("01/03/2024")),
            (4, Some("2024-02-01T00:00:00Z")),
        ];
        let (kept, _) = filter_trailing_year(records, |(_, d)| *d);
        let ids: Vec<_> = kept.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![4, 1]);
    }

    #[test]
    fn empty_input_has_no_anchor() {
        let (kept, anchor) = filter_trailing_year(Vec::<String>::new(), |r| Some(r.as_str()));
        assert!(kept.is_empty());
        assert_eq!(anchor, None);

        let (kept, anchor) = filter_trailing_year(dates(&["n/a"]), |r| Some(r.as_str()));
        assert!(kept.is_empty());
        assert_eq!(anchor, None);
    }

    #[test]
    fn output_is_sorted_ascending() {
        let records = dates(&["2024-06-01", "2024-02-01", "2024-04-01"]);
        let (kept, _) = filter_trailing_year(records, |r| Some(r.as_str()));
        assert_eq!(kept, dates(&["2024-02-01", "2024-04-01", "2024-06-01"]));
    }

    #[test]
    fn leap_day_rolls_back_to_feb_28() {
        assert_eq!(one_year_before(date(2024, 2, 29)), date(2023, 2, 28));

        let records = dates(&["2023-02-27", "2023-02-28", "2024-02-29"]);
        let (kept, _) = filter_trailing_year(records, |r| Some(r.as_str()));
        assert_eq!(kept, dates(&["2023-02-28", "2024-02-29"]));
    }
}
