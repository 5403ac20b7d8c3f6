// Date utility functions
// Naive (wall-clock) date arithmetic shared by the views and the container.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Minutes between snapped grid positions.
pub const SNAP_MINUTES: i64 = 15;

/// Sunday that starts the calendar week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday() as i64;
    date - Duration::days(offset)
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn next_month_start(date: NaiveDate) -> NaiveDate {
    shift_month_preserving_day(month_start(date), 1)
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Move by whole months, clamping the day to the target month's length
/// (Jan 31 + 1 month = Feb 28/29).
pub fn shift_month_preserving_day(current: NaiveDate, delta_months: i32) -> NaiveDate {
    let total_months = (current.year() * 12) + (current.month() as i32 - 1) + delta_months;
    let new_year = total_months.div_euclid(12);
    let new_month = total_months.rem_euclid(12) as u32 + 1;
    let day = current.day().min(last_day_of_month(new_year, new_month));
    NaiveDate::from_ymd_opt(new_year, new_month, day).unwrap_or(current)
}

pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Round a minute count to the nearest multiple of `interval`.
pub fn snap_minutes(minutes: f64, interval: i64) -> i64 {
    let interval = interval.max(1) as f64;
    ((minutes / interval).round() * interval) as i64
}

/// All 15-minute slot start times of a day, used by the editor's time pickers.
pub fn quarter_hour_slots() -> Vec<NaiveTime> {
    (0..24 * 60)
        .step_by(SNAP_MINUTES as usize)
        .filter_map(|minute| NaiveTime::from_hms_opt(minute / 60, minute % 60, 0))
        .collect()
}

/// Date range covered by `[start, end)` as individual days.
pub fn days_between(start: NaiveDate, end_exclusive: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|day| *day < end_exclusive)
        .collect()
}
