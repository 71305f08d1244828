//! Gateway trait for the marketing-email provider.

use async_trait::async_trait;

use crate::domain::entities::{
    BatchOperation, BatchStatus, CampaignId, CampaignMatch, CampaignSummary, TrackedLink,
};
use crate::error::AppError;

/// Remote operations the pipeline needs from the campaign-metrics provider.
///
/// Every method is a single attempt; retrying is the caller's concern
/// (see [`crate::application::retry::RetryingCaller`]).
///
/// # Implementations
///
/// - [`crate::infrastructure::mailchimp::MailchimpClient`] - Mailchimp Marketing API v3
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignProvider: Send + Sync {
    /// Full-text campaign search, best match first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ConnectTimeout`] when the provider is unreachable,
    /// [`AppError::Api`] on a problem response.
    async fn search_campaigns(&self, query: &str) -> Result<Vec<CampaignMatch>, AppError>;

    /// Campaign-wide open/click figures.
    async fn get_report(&self, campaign_id: &CampaignId) -> Result<CampaignSummary, AppError>;

    /// Every tracked link of the campaign, in report order.
    async fn get_click_details(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<TrackedLink>, AppError>;

    /// Submits the operations as one batch and returns the batch id.
    async fn submit_batch(&self, operations: Vec<BatchOperation>) -> Result<String, AppError>;

    /// Current state of a submitted batch.
    async fn get_batch(&self, batch_id: &str) -> Result<BatchStatus, AppError>;
}
