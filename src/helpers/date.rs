//! Ordered date layouts behind `ISODate(...)` and `Date(...)`
//!
//! Each helper owns a fixed list of layouts. The input is matched against
//! the whole of each layout in turn and the first one that parses wins, so
//! the order of the lists below is observable behavior. A layout either
//! yields a value or nothing; failures are only reported, together with the
//! full list of layouts, once every layout has been tried.
//!
//! Layouts without an offset are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::trace;

use crate::error::{DateKind, HelperError};

/// How a layout's fields map onto a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// Date and time, no offset in the input.
    DateTime,
    /// Date and time followed by a numeric offset.
    OffsetDateTime,
    /// Calendar date only, midnight UTC.
    Date,
}

/// One textual layout a date string may follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePattern {
    /// Layout as shown to users in error messages.
    pub layout: &'static str,
    format: &'static str,
    shape: Shape,
}

impl DatePattern {
    const fn new(layout: &'static str, format: &'static str, shape: Shape) -> Self {
        Self {
            layout,
            format,
            shape,
        }
    }

    /// Match `input` against this layout, consuming all of it.
    pub fn parse(&self, input: &str) -> Option<DateTime<Utc>> {
        match self.shape {
            Shape::DateTime => NaiveDateTime::parse_from_str(input, self.format)
                .ok()
                .map(|naive| naive.and_utc()),
            Shape::OffsetDateTime => DateTime::parse_from_str(input, self.format)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Shape::Date => NaiveDate::parse_from_str(input, self.format)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc()),
        }
    }
}

/// Layouts accepted by `ISODate(...)`, highest priority first.
pub const ISO_DATE_PATTERNS: &[DatePattern] = &[
    DatePattern::new(
        "yyyy-MM-dd'T'HH:mm:ss'Z'",
        "%Y-%m-%dT%H:%M:%SZ",
        Shape::DateTime,
    ),
    DatePattern::new(
        "yyyy-MM-dd'T'HH:mm.ss'Z'",
        "%Y-%m-%dT%H:%M.%SZ",
        Shape::DateTime,
    ),
    DatePattern::new("yyyy-MM-dd'T'HH:mm:ss", "%Y-%m-%dT%H:%M:%S", Shape::DateTime),
    DatePattern::new("yyyy-MM-dd' 'HH:mm:ss", "%Y-%m-%d %H:%M:%S", Shape::DateTime),
    DatePattern::new(
        "yyyy-MM-dd'T'HH:mm:ssXXX",
        "%Y-%m-%dT%H:%M:%S%:z",
        Shape::OffsetDateTime,
    ),
    DatePattern::new("yyyy-MM-dd", "%Y-%m-%d", Shape::Date),
];

/// Layouts accepted by `Date(...)`, highest priority first.
pub const CALENDAR_DATE_PATTERNS: &[DatePattern] = &[
    DatePattern::new("yyyy-MM-dd", "%Y-%m-%d", Shape::Date),
    DatePattern::new("dd-MM-yyyy", "%d-%m-%Y", Shape::Date),
    DatePattern::new("dd.MM.yyyy", "%d.%m.%Y", Shape::Date),
    DatePattern::new("d.MM.yyyy", "%d.%m.%Y", Shape::Date),
    DatePattern::new("dd/MM/yyyy", "%d/%m/%Y", Shape::Date),
    DatePattern::new("yyyy.MM.dd", "%Y.%m.%d", Shape::Date),
    DatePattern::new("M/d/yyyy", "%m/%d/%Y", Shape::Date),
];

/// Parse `input` with the first layout in `patterns` that matches it.
pub fn parse_first_match(
    kind: DateKind,
    patterns: &[DatePattern],
    input: &str,
) -> Result<DateTime<Utc>, HelperError> {
    for pattern in patterns {
        if let Some(parsed) = pattern.parse(input) {
            trace!("'{}' matched {} layout {}", input, kind, pattern.layout);
            return Ok(parsed);
        }
    }

    Err(HelperError::UnparsableDate {
        kind,
        input: input.to_string(),
        patterns: patterns.iter().map(|p| p.layout).collect(),
    })
}

/// `ISODate(str)`
pub fn iso_date(input: &str) -> Result<DateTime<Utc>, HelperError> {
    parse_first_match(DateKind::Iso, ISO_DATE_PATTERNS, input)
}

/// `Date(str)`
pub fn calendar_date(input: &str) -> Result<DateTime<Utc>, HelperError> {
    parse_first_match(DateKind::Calendar, CALENDAR_DATE_PATTERNS, input)
}

/// Index of the first layout in `patterns` that accepts `input`.
pub fn matching_pattern(patterns: &[DatePattern], input: &str) -> Option<usize> {
    patterns.iter().position(|p| p.parse(input).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_iso_date_each_layout() {
        let cases = [
            ("2020-01-02T03:04:05Z", 0, utc(2020, 1, 2, 3, 4, 5)),
            ("2020-01-02T03:04.05Z", 1, utc(2020, 1, 2, 3, 4, 5)),
            ("2020-01-02T03:04:05", 2, utc(2020, 1, 2, 3, 4, 5)),
            ("2020-01-02 03:04:05", 3, utc(2020, 1, 2, 3, 4, 5)),
            ("2020-01-02T03:04:05+02:00", 4, utc(2020, 1, 2, 1, 4, 5)),
            ("2020-01-02", 5, utc(2020, 1, 2, 0, 0, 0)),
        ];

        for (input, layout, expected) in cases {
            assert_eq!(
                matching_pattern(ISO_DATE_PATTERNS, input),
                Some(layout),
                "layout for {input}"
            );
            assert_eq!(iso_date(input).unwrap(), expected, "value for {input}");
        }
    }

    #[test]
    fn test_iso_date_negative_offset() {
        assert_eq!(
            iso_date("2020-01-02T03:04:05-05:30").unwrap(),
            utc(2020, 1, 2, 8, 34, 5)
        );
    }

    #[test]
    fn test_iso_date_rejects_garbage() {
        let err = iso_date("not-a-date").unwrap_err();
        match err {
            HelperError::UnparsableDate {
                kind,
                input,
                patterns,
            } => {
                assert_eq!(kind, DateKind::Iso);
                assert_eq!(input, "not-a-date");
                assert_eq!(patterns.len(), 6);
                assert_eq!(patterns[0], "yyyy-MM-dd'T'HH:mm:ss'Z'");
                assert_eq!(patterns[5], "yyyy-MM-dd");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_iso_date_rejects_out_of_range_fields() {
        assert!(iso_date("2020-13-02T03:04:05Z").is_err());
        assert!(iso_date("2020-01-02T25:04:05Z").is_err());
    }

    #[test]
    fn test_iso_date_requires_whole_input() {
        assert!(iso_date("2020-01-02T03:04:05Zjunk").is_err());
        assert!(iso_date("2020-01-02x").is_err());
    }

    #[test]
    fn test_zulu_suffix_resolves_via_first_layout() {
        // The literal 'Z' layout and the offset layout both accept this shape;
        // the literal one is listed first.
        let input = "2021-06-30T12:00:00Z";
        assert_eq!(matching_pattern(ISO_DATE_PATTERNS, input), Some(0));
        assert_eq!(iso_date(input).unwrap(), utc(2021, 6, 30, 12, 0, 0));
    }

    #[test]
    fn test_calendar_date_each_layout() {
        let cases = [
            ("2020-12-31", 0),
            ("31-12-2020", 1),
            ("31.12.2020", 2),
            ("31/12/2020", 4),
            ("2020.12.31", 5),
            ("12/31/2020", 6),
        ];

        for (input, layout) in cases {
            assert_eq!(
                matching_pattern(CALENDAR_DATE_PATTERNS, input),
                Some(layout),
                "layout for {input}"
            );
            assert_eq!(
                calendar_date(input).unwrap(),
                utc(2020, 12, 31, 0, 0, 0),
                "value for {input}"
            );
        }
    }

    #[test]
    fn test_single_digit_day_with_dots() {
        assert_eq!(calendar_date("1.12.2020").unwrap(), utc(2020, 12, 1, 0, 0, 0));
    }

    #[test]
    fn test_calendar_layouts_agree_across_notations() {
        assert_eq!(
            calendar_date("31/12/2020").unwrap(),
            calendar_date("2020.12.31").unwrap()
        );
    }

    #[test]
    fn test_ambiguous_slash_date_prefers_day_first() {
        // Both dd/MM/yyyy and M/d/yyyy accept this; dd/MM/yyyy comes first.
        let input = "01/02/2020";
        assert_eq!(matching_pattern(CALENDAR_DATE_PATTERNS, input), Some(4));
        assert!(CALENDAR_DATE_PATTERNS[6].parse(input).is_some());
        assert_eq!(calendar_date(input).unwrap(), utc(2020, 2, 1, 0, 0, 0));
    }

    #[test]
    fn test_calendar_date_rejects_garbage() {
        let err = calendar_date("yesterday").unwrap_err();
        assert!(matches!(
            err,
            HelperError::UnparsableDate { kind: DateKind::Calendar, ref patterns, .. }
                if patterns.len() == 7
        ));
        assert!(err.to_string().starts_with("Un-parsable date: yesterday"));
    }

    #[test]
    fn test_calendar_date_does_not_take_time() {
        assert!(calendar_date("2020-12-31T00:00:00Z").is_err());
    }
}
