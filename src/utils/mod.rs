//! Date and time helpers used when naming and stamping published sheets.
//!
//! - [`calendar`] - Fridays of a month, spreadsheet and worksheet titles
//! - [`timezone`] - US Central offset and the "last updated" timestamp

pub mod calendar;
pub mod timezone;
