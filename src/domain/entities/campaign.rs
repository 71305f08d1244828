//! Campaign identity and campaign-wide statistics.

use std::fmt;

/// Provider-assigned identifier of one email campaign.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CampaignId(String);

impl CampaignId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One hit returned by the campaign search.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignMatch {
    pub id: CampaignId,
    pub title: Option<String>,
}

/// Campaign-wide aggregate reported by the provider.
///
/// `total_clicks` and `unique_clicks` are the denominators of every
/// [`crate::domain::entities::UrlRate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CampaignSummary {
    pub open_rate: f64,
    pub click_rate: f64,
    pub total_clicks: u64,
    pub unique_clicks: u64,
}

impl CampaignSummary {
    pub fn new(open_rate: f64, click_rate: f64, total_clicks: u64, unique_clicks: u64) -> Self {
        Self {
            open_rate,
            click_rate,
            total_clicks,
            unique_clicks,
        }
    }
}
