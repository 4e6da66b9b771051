//! Field parsing helpers for accident CSV rows.
//!
//! Every parser coerces unparseable input to "missing" instead of failing,
//! so one bad cell never drops an entire file.

use chrono::NaiveDate;

/// Parses a decimal number that may use either `.` or `,` as the decimal
/// separator (`"145,6"` and `"145.6"` are equivalent). Returns `None` for
/// empty, unparseable, or non-finite input.
#[must_use]
pub fn parse_decimal(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = if trimmed.contains(',') {
        trimmed.replace(',', ".").parse::<f64>().ok()?
    } else {
        trimmed.parse::<f64>().ok()?
    };
    value.is_finite().then_some(value)
}

/// Parses lat/lng from optional string fields. Returns `None` if either is
/// missing or unparseable.
#[must_use]
pub fn parse_lat_lng(lat: Option<&str>, lng: Option<&str>) -> Option<(f64, f64)> {
    let latitude = parse_decimal(lat?)?;
    let longitude = parse_decimal(lng?)?;
    Some((latitude, longitude))
}

/// Parses an accident date.
///
/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY`, and any string starting with an ISO
/// date (e.g. `2023-01-15T10:30:00`).
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y") {
        return Some(date);
    }
    trimmed
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Parses a non-negative count such as `mortos`. Unparseable or negative
/// values count as zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_count(s: &str) -> u32 {
    parse_decimal(s)
        .filter(|v| *v >= 0.0)
        .map_or(0, |v| v.min(f64::from(u32::MAX)) as u32)
}

/// Returns the trimmed value, or `None` when it is blank.
#[must_use]
pub fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dot_and_comma_decimals() {
        assert!((parse_decimal("145.6").unwrap() - 145.6).abs() < f64::EPSILON);
        assert!((parse_decimal("145,6").unwrap() - 145.6).abs() < f64::EPSILON);
        assert!((parse_decimal(" 12 ").unwrap() - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_garbage_decimals() {
        assert!(parse_decimal("").is_none());
        assert!(parse_decimal("   ").is_none());
        assert!(parse_decimal("km").is_none());
        assert!(parse_decimal("NaN").is_none());
        assert!(parse_decimal("inf").is_none());
    }

    #[test]
    fn parses_lat_lng_strings() {
        let (la, lo) = parse_lat_lng(Some("-12,9714"), Some("-38.5014")).unwrap();
        assert!((la - -12.9714).abs() < f64::EPSILON);
        assert!((lo - -38.5014).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_missing_lat_lng() {
        assert!(parse_lat_lng(None, Some("-38.5")).is_none());
        assert!(parse_lat_lng(Some("-12.9"), Some("")).is_none());
    }

    #[test]
    fn parses_supported_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        assert_eq!(parse_date("2023-01-15"), Some(expected));
        assert_eq!(parse_date("15/01/2023"), Some(expected));
        assert_eq!(parse_date("2023-01-15T10:30:00"), Some(expected));
        assert_eq!(parse_date("2023-01-15 10:30:00"), Some(expected));
    }

    #[test]
    fn rejects_invalid_date() {
        assert!(parse_date("not-a-date").is_none());
        assert!(parse_date("2023-02-30").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn counts_coerce_to_zero() {
        assert_eq!(parse_count("2"), 2);
        assert_eq!(parse_count("1.0"), 1);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("-1"), 0);
        assert_eq!(parse_count("x"), 0);
    }

    #[test]
    fn blank_values_are_missing() {
        assert_eq!(non_empty("  Automóvel "), Some("Automóvel".to_string()));
        assert_eq!(non_empty("   "), None);
    }
}
