//! Campaign lookup by human-readable name.

use std::sync::Arc;

use crate::application::retry::RetryingCaller;
use crate::domain::entities::CampaignId;
use crate::domain::gateways::CampaignProvider;
use crate::error::AppError;

/// Maps a free-text search string to the provider's campaign id.
pub struct CampaignResolver<P: CampaignProvider> {
    provider: Arc<P>,
    caller: RetryingCaller,
}

impl<P: CampaignProvider> CampaignResolver<P> {
    pub fn new(provider: Arc<P>, caller: RetryingCaller) -> Self {
        Self { provider, caller }
    }

    /// Returns the id of the first search hit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CampaignNotFound`] if the search has no results.
    /// That is an input error and is never retried.
    pub async fn resolve(&self, query: &str) -> Result<CampaignId, AppError> {
        let matches = self
            .caller
            .call(|| self.provider.search_campaigns(query))
            .await?;

        let first = matches
            .into_iter()
            .next()
            .ok_or_else(|| AppError::CampaignNotFound(query.to_string()))?;

        tracing::info!(campaign_id = %first.id, query, "Resolved campaign");
        Ok(first.id)
    }
}
