//! Google Sheets output.
//!
//! - [`GoogleSheetsPublisher`] - [`crate::domain::gateways::SheetPublisher`] over Sheets v4 and Drive v3
//! - [`layout`] - Cell ranges and request bodies, free of I/O

mod google_sheets;
pub mod layout;

pub use google_sheets::GoogleSheetsPublisher;
