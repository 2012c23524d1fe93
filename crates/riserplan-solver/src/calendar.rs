//! Working-day calendar
//!
//! Maps abstract working-day indices onto real dates with a fixed
//! Monday–Friday week. There is no holiday model.

use chrono::{Datelike, NaiveDate, Weekday};

/// Monday through Friday
pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(chrono::Duration::days(days))
        .unwrap_or(NaiveDate::MAX)
}

/// Calendar days needed to consume `work_days` working days from `start`.
///
/// Walks forward one date at a time and stops right after the last
/// working day is consumed, so weekends that precede it are counted and
/// trailing weekends are not.
///
/// Linear in `work_days`. Every task is capped at
/// [`MAX_TASK_DAYS`](riserplan_core::MAX_TASK_DAYS), which bounds the walk
/// for any schedule the engine produces.
pub fn work_days_to_calendar_days(start: NaiveDate, work_days: i64) -> i64 {
    let mut remaining = work_days.max(0);
    let mut calendar_days = 0;
    let mut date = start;

    while remaining > 0 {
        if is_working_day(date) {
            remaining -= 1;
        }
        calendar_days += 1;
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    calendar_days
}

/// Start date and exclusive end date of working-day range `[start_day, end_day)`.
///
/// The start date is rolled forward onto the working day it denotes, so a
/// task never appears to begin on a weekend. The exclusive end is the day
/// after the last working day of the range; an empty range ends where it
/// starts.
pub fn map_work_range_to_dates(
    start: NaiveDate,
    start_day: i64,
    end_day: i64,
) -> (NaiveDate, NaiveDate) {
    let mut first = add_days(start, work_days_to_calendar_days(start, start_day));
    for _ in 0..7 {
        if is_working_day(first) {
            break;
        }
        first = add_days(first, 1);
    }

    if end_day <= start_day {
        return (first, first);
    }

    let end_exclusive = add_days(start, work_days_to_calendar_days(start, end_day));
    (first, end_exclusive)
}

/// Count working days in `[from, to)`
pub fn count_working_days(from: NaiveDate, to: NaiveDate) -> i64 {
    if to <= from {
        return 0;
    }

    let mut date = from;
    let mut count = 0;
    while date < to {
        if is_working_day(date) {
            count += 1;
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    count
}
