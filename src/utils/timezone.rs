//! US Central time for the "last updated" stamp on published sheets.
//!
//! Daylight saving runs from the second Sunday of March at 02:00 to the
//! first Sunday of November at 02:00 daylight time, both compared on the
//! standard-time wall clock.

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// `October 16, 2026 at 3:07 PM`
pub const UPDATED_AT_FORMAT: &str = "%B %-d, %Y at %-I:%M %p";

const STANDARD_OFFSET_HOURS: i32 = -6;

/// Central offset in effect at `instant`.
pub fn central_offset(instant: DateTime<Utc>) -> FixedOffset {
    let standard_wall =
        instant.naive_utc() + chrono::TimeDelta::hours(i64::from(STANDARD_OFFSET_HOURS));
    let year = standard_wall.year();

    let dst = match (
        nth_sunday(year, 3, 2).and_then(|d| d.and_hms_opt(2, 0, 0)),
        nth_sunday(year, 11, 1).and_then(|d| d.and_hms_opt(1, 0, 0)),
    ) {
        (Some(start), Some(end)) => in_range(standard_wall, start, end),
        _ => false,
    };

    let hours = STANDARD_OFFSET_HOURS + i32::from(dst);
    FixedOffset::east_opt(hours * 3600).expect("offset is within one day")
}

fn in_range(t: NaiveDateTime, start: NaiveDateTime, end: NaiveDateTime) -> bool {
    start <= t && t < end
}

/// The `n`th Sunday (1-based) of the given month.
fn nth_sunday(year: i32, month: u32, n: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let to_sunday = (7 - first.weekday().num_days_from_sunday()) % 7;
    first.checked_add_days(Days::new(u64::from(to_sunday + 7 * (n - 1))))
}

pub fn to_central(instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    instant.with_timezone(&central_offset(instant))
}

pub fn now_central() -> DateTime<FixedOffset> {
    to_central(Utc::now())
}

/// Today's calendar date in Central time.
pub fn today_central() -> NaiveDate {
    now_central().date_naive()
}

pub fn format_updated_at(instant: DateTime<Utc>) -> String {
    to_central(instant).format(UPDATED_AT_FORMAT).to_string()
}
