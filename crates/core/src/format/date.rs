//! Date rendering in the Brazilian `DD/MM/YYYY` convention.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const OUTPUT_FORMAT: &str = "%d/%m/%Y";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse the date portion of a backend timestamp.
///
/// Accepts RFC 3339 (`2024-03-05T10:00:00-03:00`), naive ISO timestamps,
/// bare `YYYY-MM-DD` dates and already formatted `DD/MM/YYYY` strings.
/// Zoned timestamps keep the calendar date of their own offset.
#[must_use]
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(input, "%Y-%m-%d").ok())
        .or_else(|| NaiveDate::parse_from_str(input, OUTPUT_FORMAT).ok())
}

/// Render a backend date as `DD/MM/YYYY`, or an empty string when it cannot
/// be parsed.
///
/// ```
/// use vitrine_core::format::format_date_br;
///
/// assert_eq!(format_date_br("2024-03-05"), "05/03/2024");
/// assert_eq!(format_date_br("ontem"), "");
/// ```
#[must_use]
pub fn format_date_br(input: &str) -> String {
    parse_date(input).map_or_else(String::new, |date| {
        date.format(OUTPUT_FORMAT).to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_br_inputs() {
        assert_eq!(format_date_br("2024-12-31"), "31/12/2024");
        assert_eq!(format_date_br("2024-01-02T15:04:05Z"), "02/01/2024");
        assert_eq!(format_date_br("2024-01-02T23:30:00-03:00"), "02/01/2024");
        assert_eq!(format_date_br("2024-01-02T08:00:00.123456"), "02/01/2024");
        assert_eq!(format_date_br("2024-01-02 08:00:00"), "02/01/2024");
        assert_eq!(format_date_br(" 09/07/2023 "), "09/07/2023");
    }

    #[test]
    fn test_format_date_br_invalid() {
        assert_eq!(format_date_br(""), "");
        assert_eq!(format_date_br("2024-02-30"), "");
        assert_eq!(format_date_br("not a date"), "");
        assert_eq!(format_date_br("1700000000"), "");
    }
}
