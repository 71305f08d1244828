//! Polling submitted batches until their results are downloadable.

use std::sync::Arc;

use crate::application::retry::RetryingCaller;
use crate::domain::entities::{BatchStatus, ClickJob};
use crate::domain::gateways::CampaignProvider;
use crate::error::AppError;

/// Polls each [`ClickJob`] until the provider reports a result location.
///
/// Jobs are polled one after another. There is no overall deadline unless
/// the caller was built with a retry ceiling.
pub struct BatchPoller<P: CampaignProvider> {
    provider: Arc<P>,
    caller: RetryingCaller,
}

impl<P: CampaignProvider> BatchPoller<P> {
    pub fn new(provider: Arc<P>, caller: RetryingCaller) -> Self {
        Self { provider, caller }
    }

    /// Polls a single job to completion.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RetriesExhausted`] if a ceiling is configured and
    /// reached; propagates non-transient provider errors.
    pub async fn poll(&self, mut job: ClickJob) -> Result<ClickJob, AppError> {
        let status = self
            .caller
            .call_until(
                || self.provider.get_batch(&job.job_id),
                BatchStatus::is_complete,
            )
            .await?;

        if status.errored_operations > 0 {
            tracing::warn!(
                job_id = %job.job_id,
                errored = status.errored_operations,
                total = status.total_operations,
                "Batch finished with errored operations"
            );
        }

        tracing::info!(url = %job.url, job_id = %job.job_id, "Batch complete");
        job.result_location = status.response_body_url;
        Ok(job)
    }

    /// Polls every job, sequentially, and returns them with their result
    /// locations filled in.
    ///
    /// # Errors
    ///
    /// See [`Self::poll`].
    pub async fn poll_all(&self, jobs: Vec<ClickJob>) -> Result<Vec<ClickJob>, AppError> {
        let mut completed = Vec::with_capacity(jobs.len());
        for job in jobs {
            completed.push(self.poll(job).await?);
        }
        Ok(completed)
    }
}
