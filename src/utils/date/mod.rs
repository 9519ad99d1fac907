// Date utility functions
// Day/hour arithmetic on timezone-naive timestamps used by the time grid

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

pub const MINUTES_PER_HOUR: i64 = 60;
pub const HOURS_PER_DAY: u32 = 24;

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Timestamp of `hour`:00 on `date`. Hour 24 is midnight of the following day.
pub fn at_hour(date: NaiveDate, hour: u32) -> NaiveDateTime {
    start_of_day(date) + Duration::hours(hour.min(HOURS_PER_DAY) as i64)
}

/// Signed minutes between midnight of `day` and `at`.
pub fn minutes_since_midnight(at: NaiveDateTime, day: NaiveDate) -> i64 {
    (at - start_of_day(day)).num_minutes()
}

/// Hour in which the timestamp falls, rounding any partial hour up.
/// A timestamp on a later day than `day` counts as hour 24.
pub fn ceil_hour(at: NaiveDateTime, day: NaiveDate) -> u32 {
    let minutes = minutes_since_midnight(at, day);
    if minutes <= 0 {
        return 0;
    }
    let hours = (minutes + MINUTES_PER_HOUR - 1) / MINUTES_PER_HOUR;
    hours.min(HOURS_PER_DAY as i64) as u32
}
