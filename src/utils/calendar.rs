//! Calendar arithmetic behind the monthly spreadsheet layout.
//!
//! One spreadsheet exists per month and holds one worksheet per Friday of
//! that month. A run writes into the worksheet of its week's Friday.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Spreadsheet title, e.g. `2026-10 October`.
pub const SPREADSHEET_NAME_FORMAT: &str = "%Y-%m %B";

/// Worksheet title, e.g. `October 2`.
pub const SHEET_NAME_FORMAT: &str = "%B %-d";

/// Every Friday in the month of `date`, in order.
///
/// # Examples
///
/// ```ignore
/// let fridays = fridays_in_month(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
/// assert_eq!(fridays.len(), 5); // Oct 2, 9, 16, 23, 30
/// ```
pub fn fridays_in_month(date: NaiveDate) -> Vec<NaiveDate> {
    let Some(first) = date.with_day(1) else {
        return Vec::new();
    };

    let offset = (7 + Weekday::Fri.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    let mut friday = first + Days::new(u64::from(offset));

    let mut fridays = Vec::with_capacity(5);
    while friday.month() == first.month() {
        fridays.push(friday);
        friday = friday + Days::new(7);
    }
    fridays
}

/// The most recent Friday on or before `date`.
pub fn week_friday(date: NaiveDate) -> NaiveDate {
    let back = (7 + date.weekday().num_days_from_monday() - Weekday::Fri.num_days_from_monday()) % 7;
    date - Days::new(u64::from(back))
}

pub fn spreadsheet_name(date: NaiveDate) -> String {
    date.format(SPREADSHEET_NAME_FORMAT).to_string()
}

pub fn sheet_name(date: NaiveDate) -> String {
    date.format(SHEET_NAME_FORMAT).to_string()
}
