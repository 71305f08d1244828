//! reqwest implementation of [`CampaignProvider`] for Mailchimp.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::domain::entities::{
    BatchOperation, BatchStatus, CampaignId, CampaignMatch, CampaignSummary, TrackedLink,
};
use crate::domain::gateways::CampaignProvider;
use crate::error::AppError;
use crate::infrastructure::http_client_builder;
use crate::infrastructure::mailchimp::dto::{
    BatchRequest, BatchResponse, ClickDetailsPage, ReportResponse, SEARCH_FIELDS,
    SearchCampaignsResponse,
};

/// Links requested per click-details page.
const CLICK_DETAILS_PAGE_SIZE: u64 = 1000;

/// Any user name is accepted; the key travels as the password.
const BASIC_AUTH_USER: &str = "campaign-metrics";

/// Mailchimp Marketing API v3 client.
///
/// Every method performs exactly one request (or one paginated walk) and
/// leaves retrying to the caller.
pub struct MailchimpClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl MailchimpClient {
    /// Creates a client for the configured datacenter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = http_client_builder(config)
            .build()
            .map_err(|e| AppError::config(format!("Mailchimp HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.mailchimp_api_url.trim_end_matches('/').to_string(),
            api_key: config.mailchimp_api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .basic_auth(BASIC_AUTH_USER, Some(&self.api_key))
    }

    /// Decodes a 2xx body, or turns the problem document into [`AppError::Api`].
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AppError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::from_problem("mailchimp", status.as_u16(), &body));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CampaignProvider for MailchimpClient {
    async fn search_campaigns(&self, query: &str) -> Result<Vec<CampaignMatch>, AppError> {
        let response = self
            .get("/search-campaigns")
            .query(&[("query", query), ("fields", SEARCH_FIELDS)])
            .send()
            .await?;

        let matches = Self::decode::<SearchCampaignsResponse>(response)
            .await?
            .into_matches();
        tracing::debug!(query, hits = matches.len(), "Campaign search finished");
        Ok(matches)
    }

    async fn get_report(&self, campaign_id: &CampaignId) -> Result<CampaignSummary, AppError> {
        let response = self
            .get(&format!("/reports/{}", campaign_id))
            .send()
            .await?;

        Ok(Self::decode::<ReportResponse>(response).await?.into())
    }

    async fn get_click_details(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<TrackedLink>, AppError> {
        let path = format!("/reports/{}/click-details", campaign_id);
        let mut links: Vec<TrackedLink> = Vec::new();

        loop {
            let offset = links.len() as u64;
            let response = self
                .get(&path)
                .query(&[("count", CLICK_DETAILS_PAGE_SIZE), ("offset", offset)])
                .send()
                .await?;

            let page: ClickDetailsPage = Self::decode(response).await?;
            let received = page.urls_clicked.len();
            links.extend(page.urls_clicked.into_iter().map(TrackedLink::from));

            if received == 0 || links.len() as u64 >= page.total_items {
                break;
            }
        }

        tracing::debug!(campaign_id = %campaign_id, links = links.len(), "Fetched click details");
        Ok(links)
    }

    async fn submit_batch(&self, operations: Vec<BatchOperation>) -> Result<String, AppError> {
        let response = self
            .client
            .post(self.url("/batches"))
            .basic_auth(BASIC_AUTH_USER, Some(&self.api_key))
            .json(&BatchRequest {
                operations: &operations,
            })
            .send()
            .await?;

        let batch: BatchResponse = Self::decode(response).await?;
        Ok(batch.id)
    }

    async fn get_batch(&self, batch_id: &str) -> Result<BatchStatus, AppError> {
        let response = self.get(&format!("/batches/{}", batch_id)).send().await?;

        Ok(Self::decode::<BatchResponse>(response).await?.into())
    }
}
