//! Wire shapes of the Mailchimp Marketing API v3 responses the pipeline reads.
//!
//! Only the fields in use are declared; everything else is ignored.

use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, NoneAsEmptyString, serde_as};

use crate::domain::entities::{
    BatchOperation, BatchStatus, CampaignId, CampaignMatch, CampaignSummary, TrackedLink,
};

/// `fields` filter sent with every campaign search.
pub const SEARCH_FIELDS: &str = "results.campaign.id,results.campaign.settings.title";

#[derive(Debug, Deserialize)]
pub struct SearchCampaignsResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    pub campaign: CampaignRef,
}

#[derive(Debug, Deserialize)]
pub struct CampaignRef {
    pub id: String,
    #[serde(default)]
    pub settings: Option<CampaignSettings>,
}

#[derive(Debug, Deserialize)]
pub struct CampaignSettings {
    #[serde(default)]
    pub title: Option<String>,
}

impl SearchCampaignsResponse {
    pub fn into_matches(self) -> Vec<CampaignMatch> {
        self.results
            .into_iter()
            .map(|r| CampaignMatch {
                id: CampaignId::new(r.campaign.id),
                title: r.campaign.settings.and_then(|s| s.title),
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ReportResponse {
    pub opens: OpensSection,
    pub clicks: ClicksSection,
}

#[derive(Debug, Deserialize)]
pub struct OpensSection {
    pub open_rate: f64,
}

#[derive(Debug, Deserialize)]
pub struct ClicksSection {
    pub click_rate: f64,
    pub clicks_total: u64,
    pub unique_clicks: u64,
}

impl From<ReportResponse> for CampaignSummary {
    fn from(r: ReportResponse) -> Self {
        CampaignSummary::new(
            r.opens.open_rate,
            r.clicks.click_rate,
            r.clicks.clicks_total,
            r.clicks.unique_clicks,
        )
    }
}

/// One page of `GET /reports/{id}/click-details`.
#[derive(Debug, Deserialize)]
pub struct ClickDetailsPage {
    #[serde(default)]
    pub urls_clicked: Vec<UrlClicked>,
    #[serde(default)]
    pub total_items: u64,
}

#[derive(Debug, Deserialize)]
pub struct UrlClicked {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub click_percentage: f64,
    #[serde(default)]
    pub unique_click_percentage: f64,
}

impl From<UrlClicked> for TrackedLink {
    fn from(u: UrlClicked) -> Self {
        TrackedLink::new(u.id, u.url, u.click_percentage, u.unique_click_percentage)
    }
}

/// Body of `POST /batches`.
#[derive(Debug, Serialize)]
pub struct BatchRequest<'a> {
    pub operations: &'a [BatchOperation],
}

/// `POST /batches` and `GET /batches/{id}` both answer with this shape.
///
/// `response_body_url` is an empty string (sometimes `null`) until the batch
/// has finished.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct BatchResponse {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub total_operations: u64,
    #[serde(default)]
    pub finished_operations: u64,
    #[serde(default)]
    pub errored_operations: u64,
    #[serde_as(as = "DefaultOnNull<NoneAsEmptyString>")]
    #[serde(default)]
    pub response_body_url: Option<String>,
}

impl From<BatchResponse> for BatchStatus {
    fn from(b: BatchResponse) -> Self {
        BatchStatus {
            id: b.id,
            status: b.status,
            total_operations: b.total_operations,
            finished_operations: b.finished_operations,
            errored_operations: b.errored_operations,
            response_body_url: b.response_body_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::LinkId;
    use serde_json::json;

    #[test]
    fn test_search_results_keep_order() {
        let body = json!({
            "results": [
                {"campaign": {"id": "c1", "settings": {"title": "Friday 1"}}},
                {"campaign": {"id": "c2"}}
            ]
        });

        let matches = serde_json::from_value::<SearchCampaignsResponse>(body)
            .unwrap()
            .into_matches();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, CampaignId::new("c1"));
        assert_eq!(matches[0].title.as_deref(), Some("Friday 1"));
        assert_eq!(matches[1].title, None);
    }

    #[test]
    fn test_empty_search() {
        let response: SearchCampaignsResponse =
            serde_json::from_value(json!({"results": [], "total_items": 0})).unwrap();

        assert!(response.into_matches().is_empty());
    }

    #[test]
    fn test_report_summary() {
        let body = json!({
            "id": "c1",
            "opens": {"opens_total": 900, "open_rate": 0.245646},
            "clicks": {"clicks_total": 1000, "unique_clicks": 48, "click_rate": 0.012345}
        });

        let summary: CampaignSummary = serde_json::from_value::<ReportResponse>(body)
            .unwrap()
            .into();

        assert_eq!(summary, CampaignSummary::new(0.245646, 0.012345, 1000, 48));
    }

    #[test]
    fn test_click_details_page() {
        let body = json!({
            "urls_clicked": [
                {"id": "l1", "url": "https://www.youtube.com/", "click_percentage": 0.4002, "unique_click_percentage": 0.02931}
            ],
            "campaign_id": "c1",
            "total_items": 3
        });

        let page: ClickDetailsPage = serde_json::from_value(body).unwrap();
        let link: TrackedLink = page.urls_clicked.into_iter().next().unwrap().into();

        assert_eq!(page.total_items, 3);
        assert_eq!(link.id, LinkId::new("l1"));
        assert_eq!(link.click_percentage, 0.4002);
    }

    #[test]
    fn test_batch_result_location_states() {
        let pending: BatchResponse = serde_json::from_value(json!({
            "id": "b1", "status": "started", "response_body_url": ""
        }))
        .unwrap();
        let null: BatchResponse = serde_json::from_value(json!({
            "id": "b1", "status": "pending", "response_body_url": null
        }))
        .unwrap();
        let finished: BatchResponse = serde_json::from_value(json!({
            "id": "b1",
            "status": "finished",
            "total_operations": 2,
            "finished_operations": 2,
            "errored_operations": 0,
            "response_body_url": "https://archive.example/b1.tar.gz"
        }))
        .unwrap();

        assert!(!BatchStatus::from(pending).is_complete());
        assert!(!BatchStatus::from(null).is_complete());

        let status = BatchStatus::from(finished);
        assert!(status.is_complete());
        assert_eq!(status.total_operations, 2);
    }

    #[test]
    fn test_batch_request_body() {
        let ops = vec![BatchOperation::click_members(
            &CampaignId::new("c1"),
            &LinkId::new("l1"),
        )];

        let value = serde_json::to_value(BatchRequest { operations: &ops }).unwrap();

        assert_eq!(
            value,
            json!({
                "operations": [{
                    "method": "GET",
                    "path": "/reports/c1/click-details/l1/members",
                    "params": {"count": 500},
                    "operation_id": "l1"
                }]
            })
        );
    }
}
