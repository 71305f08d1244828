//! Gateway trait for the spreadsheet the report is written to.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::CampaignReport;
use crate::error::AppError;

/// Where a finished report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishTarget {
    /// A worksheet named after the campaign inside a known spreadsheet.
    Campaign { spreadsheet_id: String },
    /// The dated worksheet of the monthly spreadsheet covering `run_date`,
    /// created from the template when missing.
    Weekly { run_date: NaiveDate },
}

/// Writes a finished [`CampaignReport`] to its destination.
///
/// Called once per run, after every remote call of the pipeline has
/// succeeded, so a failed run never leaves partial output behind.
///
/// # Implementations
///
/// - [`crate::infrastructure::sheets::GoogleSheetsPublisher`] - Google Sheets and Drive APIs
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SheetPublisher: Send + Sync {
    async fn publish(&self, target: &PublishTarget, report: &CampaignReport)
    -> Result<(), AppError>;
}
