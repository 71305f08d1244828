//! End-to-end run: campaign lookup, click aggregation, rates, publishing.

use std::sync::Arc;

use crate::application::retry::RetryingCaller;
use crate::application::services::archive_aggregator::ArchiveAggregator;
use crate::application::services::batch_poller::BatchPoller;
use crate::application::services::campaign_resolver::CampaignResolver;
use crate::application::services::click_job_submitter::ClickJobSubmitter;
use crate::application::services::rate_calculator::{compute_rates, passthrough_rates};
use crate::domain::entities::CampaignReport;
use crate::domain::gateways::{ArchiveSource, CampaignProvider, PublishTarget, SheetPublisher};
use crate::error::AppError;

/// How per-URL rates are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMode {
    /// Batch member lookups, recomputed from raw click events.
    Full,
    /// The provider's own per-link percentages, no batch jobs.
    Passthrough,
}

/// Sequences every stage of one run.
///
/// Any error aborts the run before [`SheetPublisher::publish`] is reached.
pub struct ReportPipeline<P: CampaignProvider, A: ArchiveSource, S: SheetPublisher> {
    provider: Arc<P>,
    publisher: Arc<S>,
    caller: RetryingCaller,
    resolver: CampaignResolver<P>,
    submitter: ClickJobSubmitter<P>,
    poller: BatchPoller<P>,
    aggregator: ArchiveAggregator<A>,
}

impl<P: CampaignProvider, A: ArchiveSource, S: SheetPublisher> ReportPipeline<P, A, S> {
    /// Creates a pipeline; every stage shares the same retry policy.
    pub fn new(
        provider: Arc<P>,
        archives: Arc<A>,
        publisher: Arc<S>,
        caller: RetryingCaller,
    ) -> Self {
        Self {
            resolver: CampaignResolver::new(provider.clone(), caller),
            submitter: ClickJobSubmitter::new(provider.clone(), caller),
            poller: BatchPoller::new(provider.clone(), caller),
            aggregator: ArchiveAggregator::new(archives, caller),
            provider,
            publisher,
            caller,
        }
    }

    /// Computes the report for the campaign matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CampaignNotFound`] for an unknown campaign,
    /// [`AppError::ZeroDenominator`] for a campaign without clicks, and any
    /// non-transient provider or archive error.
    pub async fn build_report(
        &self,
        query: &str,
        mode: AggregationMode,
    ) -> Result<CampaignReport, AppError> {
        let campaign_id = self.resolver.resolve(query).await?;

        let summary = self
            .caller
            .call(|| self.provider.get_report(&campaign_id))
            .await?;
        tracing::info!(
            campaign_id = %campaign_id,
            open_rate = summary.open_rate,
            click_rate = summary.click_rate,
            total_clicks = summary.total_clicks,
            unique_clicks = summary.unique_clicks,
            "Fetched campaign report"
        );

        let groups = self.submitter.link_groups(&campaign_id).await?;

        let url_rates = match mode {
            AggregationMode::Passthrough => passthrough_rates(&groups),
            AggregationMode::Full => {
                let jobs = self.submitter.submit(&campaign_id, &groups).await?;
                let jobs = self.poller.poll_all(jobs).await?;
                let totals = self.aggregator.aggregate_all(&jobs).await?;
                compute_rates(&totals, &summary)?
            }
        };

        Ok(CampaignReport {
            campaign_name: query.to_string(),
            campaign_id,
            summary,
            url_rates,
        })
    }

    /// Builds the report and hands it to the publisher.
    ///
    /// # Errors
    ///
    /// See [`Self::build_report`]; publisher errors propagate as well.
    pub async fn run(
        &self,
        query: &str,
        mode: AggregationMode,
        target: &PublishTarget,
    ) -> Result<CampaignReport, AppError> {
        let report = self.build_report(query, mode).await?;

        self.publisher.publish(target, &report).await?;
        tracing::info!(
            campaign = %report.campaign_name,
            urls = report.url_rates.len(),
            ?target,
            "Report published"
        );

        Ok(report)
    }
}
