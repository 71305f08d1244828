//! Submission of one member-lookup batch per destination URL.

use std::sync::Arc;

use crate::application::retry::RetryingCaller;
use crate::domain::entities::{BatchOperation, CampaignId, ClickJob, LinkGroups, LinkId};
use crate::domain::gateways::CampaignProvider;
use crate::error::AppError;

/// Groups a campaign's links by URL and submits their member lookups.
pub struct ClickJobSubmitter<P: CampaignProvider> {
    provider: Arc<P>,
    caller: RetryingCaller,
}

impl<P: CampaignProvider> ClickJobSubmitter<P> {
    pub fn new(provider: Arc<P>, caller: RetryingCaller) -> Self {
        Self { provider, caller }
    }

    /// Fetches every tracked link of the campaign, grouped by destination URL.
    ///
    /// # Errors
    ///
    /// Propagates non-transient provider errors.
    pub async fn link_groups(&self, campaign_id: &CampaignId) -> Result<LinkGroups, AppError> {
        let links = self
            .caller
            .call(|| self.provider.get_click_details(campaign_id))
            .await?;

        let groups = LinkGroups::from_links(links);
        tracing::info!(
            campaign_id = %campaign_id,
            links = groups.total_links(),
            urls = groups.len(),
            "Fetched tracked links"
        );
        Ok(groups)
    }

    /// Submits one batch per URL, holding one operation per link id.
    ///
    /// Jobs are returned in the order of `groups`.
    ///
    /// # Errors
    ///
    /// Propagates non-transient provider errors. Batches already submitted
    /// are left running on the provider side.
    pub async fn submit(
        &self,
        campaign_id: &CampaignId,
        groups: &LinkGroups,
    ) -> Result<Vec<ClickJob>, AppError> {
        let mut jobs = Vec::with_capacity(groups.len());

        for group in groups.iter() {
            let operations = build_operations(campaign_id, &group.link_ids);
            let operation_count = operations.len();

            let job_id = self
                .caller
                .call(|| self.provider.submit_batch(operations.clone()))
                .await?;

            tracing::info!(
                url = %group.url,
                job_id = %job_id,
                operations = operation_count,
                "Submitted click batch"
            );
            jobs.push(ClickJob::new(group.url.clone(), job_id, operation_count));
        }

        Ok(jobs)
    }
}

/// One member lookup per link id.
pub fn build_operations(campaign_id: &CampaignId, link_ids: &[LinkId]) -> Vec<BatchOperation> {
    link_ids
        .iter()
        .map(|link_id| BatchOperation::click_members(campaign_id, link_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TrackedLink;
    use crate::domain::gateways::MockCampaignProvider;
    use std::time::Duration;

    fn caller() -> RetryingCaller {
        RetryingCaller::new(Duration::ZERO, None)
    }

    fn sample_groups() -> LinkGroups {
        LinkGroups::from_links(vec![
            TrackedLink::new("l1", "https://the.ismaili/usa", 0.0, 0.0),
            TrackedLink::new("l2", "https://www.youtube.com/", 0.0, 0.0),
            TrackedLink::new("l3", "https://the.ismaili/usa", 0.0, 0.0),
            TrackedLink::new("l4", "https://the.ismaili/usa", 0.0, 0.0),
        ])
    }

    #[test]
    fn test_build_operations_one_per_link() {
        let ops = build_operations(
            &CampaignId::new("c1"),
            &[LinkId::new("a"), LinkId::new("b")],
        );

        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].path, "/reports/c1/click-details/a/members");
        assert_eq!(ops[1].path, "/reports/c1/click-details/b/members");
    }

    #[tokio::test]
    async fn test_submit_one_batch_per_url() {
        let mut mock = MockCampaignProvider::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_submit_batch()
            .withf(|ops| ops.len() == 3)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("batch-ismaili".to_string()));
        mock.expect_submit_batch()
            .withf(|ops| ops.len() == 1 && ops[0].operation_id == "l2")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("batch-youtube".to_string()));

        let submitter = ClickJobSubmitter::new(Arc::new(mock), caller());
        let jobs = submitter
            .submit(&CampaignId::new("c1"), &sample_groups())
            .await
            .unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].url, "https://the.ismaili/usa");
        assert_eq!(jobs[0].job_id, "batch-ismaili");
        assert_eq!(jobs[0].operation_count, 3);
        assert_eq!(jobs[1].job_id, "batch-youtube");
        assert!(jobs.iter().all(|j| j.result_location.is_none()));
    }

    #[tokio::test]
    async fn test_submit_failure_aborts() {
        let mut mock = MockCampaignProvider::new();
        mock.expect_submit_batch().times(1).returning(|_| {
            Err(AppError::Api {
                service: "mailchimp",
                status: 400,
                title: "Invalid Resource".to_string(),
                detail: "bad operations".to_string(),
            })
        });

        let submitter = ClickJobSubmitter::new(Arc::new(mock), caller());
        let result = submitter
            .submit(&CampaignId::new("c1"), &sample_groups())
            .await;

        assert!(matches!(result, Err(AppError::Api { status: 400, .. })));
    }

    #[tokio::test]
    async fn test_link_groups_from_click_details() {
        let mut mock = MockCampaignProvider::new();
        mock.expect_get_click_details()
            .withf(|id| id.as_str() == "c1")
            .times(1)
            .returning(|_| {
                Ok(vec![
                    TrackedLink::new("l1", "https://a.example/", 0.0, 0.0),
                    TrackedLink::new("l2", "https://a.example/", 0.0, 0.0),
                ])
            });

        let submitter = ClickJobSubmitter::new(Arc::new(mock), caller());
        let groups = submitter.link_groups(&CampaignId::new("c1")).await.unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups.total_links(), 2);
    }
}
