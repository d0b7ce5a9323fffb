//! Period strings as served by DBnomics (`2020`, `2020-03`, `2020-03-31`).

use chrono::{Datelike, NaiveDate};

/// Parse a period to the date it starts on. Returns `None` for anything else.
pub fn parse_period(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    match s.len() {
        4 if s.bytes().all(|b| b.is_ascii_digit()) => NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1),
        7 => NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok(),
        10 => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
        _ => None,
    }
}

/// 4-digit year for display, e.g. `2020-01-01` -> `2020`.
pub fn year_label(date: NaiveDate) -> String {
    date.format("%Y").to_string()
}

/// Calendar year plus the elapsed fraction of that year.
pub fn fractional_year(date: NaiveDate) -> f64 {
    let days = if date.leap_year() { 366.0 } else { 365.0 };
    date.year() as f64 + date.ordinal0() as f64 / days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_shapes() {
        let d = parse_period("2020-01-01").unwrap();
        assert_eq!(year_label(d), "2020");
        assert_eq!(parse_period("1995"), NaiveDate::from_ymd_opt(1995, 1, 1));
        assert_eq!(parse_period("2001-07"), NaiveDate::from_ymd_opt(2001, 7, 1));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_period("not-a-date").is_none());
        assert!(parse_period("").is_none());
        assert!(parse_period("2020-13-01").is_none());
        assert!(parse_period("20x0").is_none());
    }

    #[test]
    fn fractional_year_of_new_year_is_integral() {
        let d = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        assert_eq!(fractional_year(d), 1990.0);
    }
}
