//! Lenient parsing of sale dates.
//!
//! Exports carry sale dates as ISO text, US-style text, month-name text,
//! or as spreadsheet serial day numbers. Values that match none of these
//! are reported as `None` and callers treat them as maximally old.

use crate::constants::{SALE_DATE_FORMAT, SALE_DATETIME_FORMAT};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Date-time layouts tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
];

/// Date-only layouts tried in order. Two-digit years come first since `%Y`
/// would otherwise accept "24" as the year 24.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Serial day numbers accepted as spreadsheet dates (1900-03-01 .. 9999-12-31)
const SERIAL_RANGE: std::ops::RangeInclusive<f64> = 61.0..=2_958_465.0;

/// Parse a sale date cell
pub fn parse_sale_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(parsed) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(parsed);
    }

    if let Some(parsed) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
    {
        return Some(parsed.and_time(NaiveTime::MIN));
    }

    value.parse::<f64>().ok().and_then(from_spreadsheet_serial)
}

/// Convert a spreadsheet serial (1900 date system) into a date-time
pub fn from_spreadsheet_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !SERIAL_RANGE.contains(&serial) {
        return None;
    }

    // Day zero sits two days before 1900-01-01 to absorb the phantom 1900-02-29
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let days = serial.trunc() as i64;
    let seconds = ((serial - serial.trunc()) * 86_400.0).round() as i64;

    epoch.checked_add_signed(Duration::days(days) + Duration::seconds(seconds))
}

/// Render a parsed sale date in normalized form
pub fn format_sale_date(value: &NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format(SALE_DATE_FORMAT).to_string()
    } else {
        value.format(SALE_DATETIME_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_parse_iso_forms() {
        assert_eq!(parse_sale_date("2024-01-01"), Some(date(2024, 1, 1)));
        assert_eq!(parse_sale_date(" 2024/03/15 "), Some(date(2024, 3, 15)));
        assert_eq!(
            parse_sale_date("2024-01-01 10:30:00"),
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 30, 0)
        );
        assert_eq!(
            parse_sale_date("2024-01-01T10:30:00"),
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 30, 0)
        );
    }

    #[test]
    fn test_parse_us_and_month_name_forms() {
        assert_eq!(parse_sale_date("01/31/2024"), Some(date(2024, 1, 31)));
        assert_eq!(parse_sale_date("1/31/24"), Some(date(2024, 1, 31)));
        assert_eq!(parse_sale_date("01-31-2024"), Some(date(2024, 1, 31)));
        assert_eq!(parse_sale_date("January 31, 2024"), Some(date(2024, 1, 31)));
        assert_eq!(parse_sale_date("Jan 31, 2024"), Some(date(2024, 1, 31)));
        assert_eq!(parse_sale_date("31 January 2024"), Some(date(2024, 1, 31)));
    }

    #[test]
    fn test_parse_spreadsheet_serials() {
        assert_eq!(parse_sale_date("45292"), Some(date(2024, 1, 1)));
        assert_eq!(
            parse_sale_date("45292.5"),
            date(2024, 1, 1).checked_add_signed(Duration::hours(12))
        );
        assert_eq!(parse_sale_date("12"), None);
    }

    #[test]
    fn test_unparseable_values() {
        assert_eq!(parse_sale_date(""), None);
        assert_eq!(parse_sale_date("   "), None);
        assert_eq!(parse_sale_date("not a date"), None);
        assert_eq!(parse_sale_date("2024-13-45"), None);
    }

    #[test]
    fn test_format_sale_date() {
        assert_eq!(format_sale_date(&date(2024, 1, 1)), "2024-01-01");
        let with_time = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert_eq!(format_sale_date(&with_time), "2024-01-01 09:05:00");
    }
}
