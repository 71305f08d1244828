//! Asynchronous batch jobs that collect per-link click members.

use serde::Serialize;

use crate::domain::entities::{CampaignId, LinkId};

/// Recipients requested per link. Only the first page is ever fetched, so a
/// link clicked by more than this many recipients is under-counted.
pub const MEMBERS_PAGE_SIZE: u32 = 500;

/// One sub-request of a provider batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOperation {
    pub method: &'static str,
    pub path: String,
    pub params: OperationParams,
    pub operation_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationParams {
    pub count: u32,
}

impl BatchOperation {
    /// `GET /reports/{campaign}/click-details/{link}/members?count=500`
    pub fn click_members(campaign_id: &CampaignId, link_id: &LinkId) -> Self {
        Self {
            method: "GET",
            path: format!("/reports/{campaign_id}/click-details/{link_id}/members"),
            params: OperationParams {
                count: MEMBERS_PAGE_SIZE,
            },
            operation_id: link_id.to_string(),
        }
    }
}

/// Provider view of a submitted batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStatus {
    pub id: String,
    pub status: String,
    pub total_operations: u64,
    pub finished_operations: u64,
    pub errored_operations: u64,
    pub response_body_url: Option<String>,
}

impl BatchStatus {
    /// A batch is complete once the provider publishes a result location.
    pub fn is_complete(&self) -> bool {
        self.response_body_url
            .as_deref()
            .is_some_and(|url| !url.is_empty())
    }
}

/// The batch submitted for one destination URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickJob {
    pub url: String,
    pub job_id: String,
    pub operation_count: usize,
    /// Populated by the poller once the batch is complete.
    pub result_location: Option<String>,
}

impl ClickJob {
    pub fn new(url: impl Into<String>, job_id: impl Into<String>, operation_count: usize) -> Self {
        Self {
            url: url.into(),
            job_id: job_id.into(),
            operation_count,
            result_location: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.result_location.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_members_operation() {
        let op = BatchOperation::click_members(&CampaignId::new("c42"), &LinkId::new("l7"));

        assert_eq!(op.method, "GET");
        assert_eq!(op.path, "/reports/c42/click-details/l7/members");
        assert_eq!(op.params.count, 500);
        assert_eq!(op.operation_id, "l7");
    }

    #[test]
    fn test_operation_serializes_like_provider_expects() {
        let op = BatchOperation::click_members(&CampaignId::new("c"), &LinkId::new("l"));
        let value = serde_json::to_value(&op).unwrap();

        assert_eq!(value["method"], "GET");
        assert_eq!(value["params"]["count"], 500);
        assert_eq!(value["operation_id"], "l");
    }

    #[test]
    fn test_batch_status_completion() {
        let mut status = BatchStatus {
            id: "b1".to_string(),
            status: "started".to_string(),
            total_operations: 3,
            finished_operations: 1,
            errored_operations: 0,
            response_body_url: None,
        };
        assert!(!status.is_complete());

        status.response_body_url = Some(String::new());
        assert!(!status.is_complete());

        status.response_body_url = Some("https://archive.example/b1.tar.gz".to_string());
        assert!(status.is_complete());
    }

    #[test]
    fn test_click_job_starts_incomplete() {
        let job = ClickJob::new("https://www.youtube.com/", "b1", 2);

        assert!(!job.is_complete());
        assert_eq!(job.operation_count, 2);
    }
}
