//! The finished report handed to the sheet publisher.

use crate::domain::entities::{CampaignId, CampaignSummary, UrlRate};

/// Everything one run produces, computed before anything is published.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignReport {
    pub campaign_name: String,
    pub campaign_id: CampaignId,
    pub summary: CampaignSummary,
    /// Sorted by click rate, highest first.
    pub url_rates: Vec<UrlRate>,
}
