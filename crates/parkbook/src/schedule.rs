use crate::error::BookingError;
use chrono::{Duration, NaiveDate, NaiveTime, Timelike};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// How far ahead to book when neither a date nor an offset is given.
pub const DEFAULT_ADVANCE_DAYS: i64 = 15;

/// Parses an `HH:MM` wall-clock string into minutes since midnight.
pub fn parse_time(s: &str) -> Result<i64, BookingError> {
    let t = NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| BookingError::Validation {
        message: format!("invalid time '{}' (expected HH:MM, e.g. 09:30)", s),
    })?;
    Ok(i64::from(t.hour()) * 60 + i64::from(t.minute()))
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| BookingError::Validation {
        message: format!("invalid date '{}' (expected YYYY-MM-DD)", s),
    })
}

/// Formats minutes-of-day on a 12-hour clock: no leading zero on the hour,
/// two-digit minutes, AM/PM suffix. Out-of-range input wraps, so buffer
/// arithmetic that crosses midnight lands on the right clock position.
pub fn format_12h(minutes_of_day: i64) -> String {
    let m = minutes_of_day.rem_euclid(MINUTES_PER_DAY);
    let (hour, minute) = (m / 60, m % 60);
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02}{}", hour12, minute, suffix)
}

/// Derives the booking title from the slot padded by `buffer` minutes on
/// each side, e.g. 12:00-13:00 with a 15 minute buffer gives
/// "11:45AM - 1:15PM". The title carries no date, so wrapping across
/// midnight needs no rollover signal.
pub fn booking_title(start: i64, end: i64, buffer: i64) -> String {
    format!(
        "{} - {}",
        format_12h(start - buffer),
        format_12h(end + buffer)
    )
}

/// Resolves the booking date from an explicit date or a days-in-advance
/// offset. `advance` is `Some(None)` when the flag was passed without a
/// value, in which case the config default applies, then the hard default.
pub fn resolve_date(
    explicit: Option<NaiveDate>,
    advance: Option<Option<i64>>,
    config_default: Option<i64>,
    today: NaiveDate,
) -> Result<NaiveDate, BookingError> {
    match (explicit, advance) {
        (Some(_), Some(_)) => Err(BookingError::Validation {
            message: "give either a date or a days-in-advance offset, not both".to_string(),
        }),
        (Some(date), None) => Ok(date),
        (None, advance) => {
            let days = advance
                .flatten()
                .or(config_default)
                .unwrap_or(DEFAULT_ADVANCE_DAYS);
            today
                .checked_add_signed(Duration::days(days))
                .ok_or_else(|| BookingError::Validation {
                    message: format!("days-in-advance offset {} is out of range", days),
                })
        }
    }
}

/// Rejects past dates unless the caller explicitly forced them.
pub fn validate_not_past(
    date: NaiveDate,
    today: NaiveDate,
    force: bool,
) -> Result<(), BookingError> {
    if date < today && !force {
        return Err(BookingError::Validation {
            message: format!("{} is in the past (use --force-date to book anyway)", date),
        });
    }
    Ok(())
}

/// Rejects empty or inverted slots.
pub fn validate_slot(start: i64, end: i64) -> Result<(), BookingError> {
    if start >= end {
        return Err(BookingError::Validation {
            message: "start time must be before end time".to_string(),
        });
    }
    Ok(())
}
