//! Timestamp parsing and calendar arithmetic for the filter engines.
//!
//! The backend emits a mix of RFC 3339 values and offset-less
//! `LocalDateTime` strings, so parsing is lenient. Offset-less inputs are
//! read in the offset of the reference instant (the viewer's local zone).

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// Parse a backend timestamp, interpreting offset-less values in `offset`.
///
/// Returns `None` for blank or unrecognized input.
#[must_use]
pub fn parse_timestamp(raw: &str, offset: UtcOffset) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }
    parse_local(raw).map(|naive| naive.assume_offset(offset))
}

fn parse_local(raw: &str) -> Option<PrimitiveDateTime> {
    let with_subsec = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
    let with_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let minutes_only = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    let date_only = format_description!("[year]-[month]-[day]");

    PrimitiveDateTime::parse(raw, with_subsec)
        .or_else(|_| PrimitiveDateTime::parse(raw, with_seconds))
        .or_else(|_| PrimitiveDateTime::parse(raw, minutes_only))
        .ok()
        .or_else(|| {
            Date::parse(raw, date_only)
                .ok()
                .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT))
        })
}

/// Midnight at the start of the calendar day containing `dt`, in `dt`'s offset.
#[must_use]
pub fn start_of_day(dt: OffsetDateTime) -> OffsetDateTime {
    dt.replace_time(Time::MIDNIGHT)
}

/// Calendar day of `dt` once converted to `offset`.
#[must_use]
pub fn local_date(dt: OffsetDateTime, offset: UtcOffset) -> Date {
    dt.to_offset(offset).date()
}

/// Shift by whole days.
#[must_use]
pub fn add_days(dt: OffsetDateTime, days: i64) -> OffsetDateTime {
    dt.saturating_add(Duration::days(days))
}

/// Shift by calendar months, clamping the day to the target month's length.
#[must_use]
pub fn add_months(dt: OffsetDateTime, months: i32) -> OffsetDateTime {
    let date = dt.date();
    let index = date.year() * 12 + i32::from(u8::from(date.month())) - 1 + months;
    let year = index.div_euclid(12);
    let month_number = u8::try_from(index.rem_euclid(12) + 1).unwrap_or(1);
    let Ok(month) = Month::try_from(month_number) else {
        return dt;
    };
    let day = date.day().min(days_in_month(year, month));
    Date::from_calendar_date(year, month, day).map_or(dt, |shifted| dt.replace_date(shifted))
}

/// Shift by calendar years (Feb 29 clamps to Feb 28).
#[must_use]
pub fn add_years(dt: OffsetDateTime, years: i32) -> OffsetDateTime {
    add_months(dt, years.saturating_mul(12))
}

fn days_in_month(year: i32, month: Month) -> u8 {
    let (next_year, next_month) = if month == Month::December {
        (year + 1, Month::January)
    } else {
        (year, month.next())
    };
    Date::from_calendar_date(next_year, next_month, 1)
        .ok()
        .and_then(Date::previous_day)
        .map_or(28, Date::day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    fn parse(raw: &str) -> OffsetDateTime {
        parse_timestamp(raw, UtcOffset::UTC).unwrap_or_else(|| panic!("{raw} must parse"))
    }

    #[test]
    fn parses_supported_shapes() {
        assert_eq!(parse("2024-01-15T10:30:00Z"), datetime!(2024-01-15 10:30:00 UTC));
        assert_eq!(parse("2024-01-15T10:30:00"), datetime!(2024-01-15 10:30:00 UTC));
        assert_eq!(parse("2024-01-15T10:30"), datetime!(2024-01-15 10:30:00 UTC));
        assert_eq!(parse("2024-01-15T10:30:00.125"), datetime!(2024-01-15 10:30:00.125 UTC));
        assert_eq!(parse("2024-01-15"), datetime!(2024-01-15 00:00:00 UTC));
    }

    #[test]
    fn offsetless_values_use_reference_offset() {
        let parsed = parse_timestamp("2024-01-15T10:30:00", offset!(+9))
            .unwrap_or_else(|| panic!("must parse"));
        assert_eq!(parsed, datetime!(2024-01-15 10:30:00 +9));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("", UtcOffset::UTC).is_none());
        assert!(parse_timestamp("yesterday", UtcOffset::UTC).is_none());
    }

    #[test]
    fn month_arithmetic_clamps() {
        let base = datetime!(2024-03-31 12:00:00 UTC);
        assert_eq!(add_months(base, -1), datetime!(2024-02-29 12:00:00 UTC));
        assert_eq!(add_months(base, -3), datetime!(2023-12-31 12:00:00 UTC));
        assert_eq!(add_months(datetime!(2024-01-31 00:00 UTC), 1), datetime!(2024-02-29 00:00 UTC));
        assert_eq!(add_years(datetime!(2024-02-29 00:00 UTC), -1), datetime!(2023-02-28 00:00 UTC));
    }

    #[test]
    fn start_of_day_keeps_offset() {
        let dt = datetime!(2024-05-05 23:59:59 -5);
        assert_eq!(start_of_day(dt), datetime!(2024-05-05 00:00:00 -5));
    }
}
