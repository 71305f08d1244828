//! Per-URL click aggregation and derived rates.

use std::collections::HashSet;

/// Running totals for one destination URL while archives are read.
#[derive(Debug, Clone, Default)]
pub struct UrlAggregate {
    total_clicks: u64,
    recipients: HashSet<String>,
}

impl UrlAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one member record. The recipient counts once however many
    /// links or events it shows up in. A record with no clicks is ignored,
    /// keeping unique recipients at or below total clicks.
    pub fn record(&mut self, email_address: &str, clicks: u64) {
        if clicks == 0 {
            return;
        }
        self.total_clicks += clicks;
        if !self.recipients.contains(email_address) {
            self.recipients.insert(email_address.to_string());
        }
    }

    pub fn total_clicks(&self) -> u64 {
        self.total_clicks
    }

    pub fn unique_recipients(&self) -> u64 {
        self.recipients.len() as u64
    }

    /// Replaces the recipient set with its cardinality.
    pub fn finalize(self, url: impl Into<String>) -> UrlTotals {
        UrlTotals {
            url: url.into(),
            total_clicks: self.total_clicks,
            unique_recipients: self.recipients.len() as u64,
        }
    }
}

/// Finalized click totals for one destination URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTotals {
    pub url: String,
    pub total_clicks: u64,
    pub unique_recipients: u64,
}

/// Share of the campaign-wide clicks attributable to one URL.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlRate {
    pub url: String,
    pub click_rate: f64,
    pub unique_click_rate: f64,
}

impl UrlRate {
    pub fn new(url: impl Into<String>, click_rate: f64, unique_click_rate: f64) -> Self {
        Self {
            url: url.into(),
            click_rate,
            unique_click_rate,
        }
    }
}
