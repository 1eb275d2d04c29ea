use crate::domain::error::DomainError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parses an ISO-8601 calendar date. Full datetimes are accepted and truncated
/// to their date part.
pub fn parse_iso_date(field: &str, value: &str) -> Result<NaiveDate, DomainError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(datetime.date());
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.date_naive());
    }
    Err(DomainError::validation(
        field,
        format!("'{}' is not a valid ISO-8601 date", value),
    ))
}

pub fn require_date(field: &str, value: Option<&str>) -> Result<NaiveDate, DomainError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => parse_iso_date(field, v),
        _ => Err(DomainError::validation(field, "is required")),
    }
}

/// Absent, null and empty values all mean "no date".
pub fn optional_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, DomainError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => parse_iso_date(field, v).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_iso_date("termStart", "2025-02-03").unwrap(), ymd(2025, 2, 3));
    }

    #[test]
    fn test_parse_datetime_keeps_date_part() {
        assert_eq!(
            parse_iso_date("termStart", "2025-02-03T18:30:00").unwrap(),
            ymd(2025, 2, 3)
        );
        assert_eq!(
            parse_iso_date("termStart", "2025-02-03T23:30:00.250+02:00").unwrap(),
            ymd(2025, 2, 3)
        );
    }

    #[test]
    fn test_parse_rejects_garbage_with_field_name() {
        let err = parse_iso_date("termEnd", "next tuesday").unwrap_err();
        match err {
            DomainError::Validation { field, message } => {
                assert_eq!(field, "termEnd");
                assert!(message.contains("next tuesday"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_impossible_date() {
        assert!(parse_iso_date("termEnd", "2025-02-30").is_err());
    }

    #[test]
    fn test_require_date_missing_or_blank() {
        assert_eq!(
            require_date("termStart", None).unwrap_err(),
            DomainError::validation("termStart", "is required")
        );
        assert!(require_date("termStart", Some("   ")).is_err());
    }

    #[test]
    fn test_optional_date_treats_empty_as_none() {
        assert_eq!(optional_date("mainExamDate", None).unwrap(), None);
        assert_eq!(optional_date("mainExamDate", Some("")).unwrap(), None);
        assert_eq!(
            optional_date("mainExamDate", Some("2025-06-01")).unwrap(),
            Some(ymd(2025, 6, 1))
        );
    }
}
