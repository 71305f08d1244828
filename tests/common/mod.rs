#![allow(dead_code)]

use async_trait::async_trait;
use campaign_metrics::prelude::*;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tar::{Builder, Header};

pub const ISMAILI: &str = "https://the.ismaili/usa";
pub const YOUTUBE: &str = "https://www.youtube.com/";

/// In-memory provider with the `Test1` / `Test2` campaigns.
///
/// Batches become ready after `polls_until_ready` status checks.
pub struct FixtureProvider {
    pub summary: CampaignSummary,
    pub links: Vec<TrackedLink>,
    pub polls_until_ready: u32,
    pub submitted: Mutex<Vec<Vec<BatchOperation>>>,
    pub status_checks: AtomicU32,
    pub calls: Mutex<Vec<String>>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self {
            summary: CampaignSummary::new(0.245646, 0.012345, 100_000, 100_000),
            links: vec![
                TrackedLink::new("l1", ISMAILI, 0.23475, 0.01021),
                TrackedLink::new("l2", YOUTUBE, 0.40020, 0.02931),
                TrackedLink::new("l3", ISMAILI, 0.0, 0.0),
            ],
            polls_until_ready: 2,
            submitted: Mutex::new(Vec::new()),
            status_checks: AtomicU32::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CampaignProvider for FixtureProvider {
    async fn search_campaigns(&self, query: &str) -> Result<Vec<CampaignMatch>, AppError> {
        self.record("search_campaigns");
        Ok([("Test1", "test1"), ("Test2", "test2")]
            .into_iter()
            .filter(|(title, _)| title.contains(query))
            .map(|(title, id)| CampaignMatch {
                id: CampaignId::new(id),
                title: Some(title.to_string()),
            })
            .collect())
    }

    async fn get_report(&self, _campaign_id: &CampaignId) -> Result<CampaignSummary, AppError> {
        self.record("get_report");
        Ok(self.summary)
    }

    async fn get_click_details(
        &self,
        _campaign_id: &CampaignId,
    ) -> Result<Vec<TrackedLink>, AppError> {
        self.record("get_click_details");
        Ok(self.links.clone())
    }

    async fn submit_batch(&self, operations: Vec<BatchOperation>) -> Result<String, AppError> {
        self.record("submit_batch");
        let mut submitted = self.submitted.lock().unwrap();
        let batch_id = format!("batch-{}", submitted.len());
        submitted.push(operations);
        Ok(batch_id)
    }

    async fn get_batch(&self, batch_id: &str) -> Result<BatchStatus, AppError> {
        self.record("get_batch");
        let checks = self.status_checks.fetch_add(1, Ordering::SeqCst) + 1;
        let ready = checks % self.polls_until_ready == 0;

        Ok(BatchStatus {
            id: batch_id.to_string(),
            status: if ready { "finished" } else { "started" }.to_string(),
            total_operations: 1,
            finished_operations: u64::from(ready),
            errored_operations: 0,
            response_body_url: ready.then(|| archive_location(batch_id)),
        })
    }
}

pub fn archive_location(batch_id: &str) -> String {
    format!("https://archives.example/{batch_id}.tar.gz")
}

/// Serves pre-built archives by location.
#[derive(Default)]
pub struct FixtureArchives {
    pub archives: HashMap<String, Vec<u8>>,
    pub fetches: AtomicU32,
}

impl FixtureArchives {
    pub fn with(mut self, batch_id: &str, bytes: Vec<u8>) -> Self {
        self.archives.insert(archive_location(batch_id), bytes);
        self
    }
}

#[async_trait]
impl ArchiveSource for FixtureArchives {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, AppError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.archives
            .get(location)
            .cloned()
            .ok_or_else(|| AppError::Api {
                service: "archive",
                status: 404,
                title: "Not Found".to_string(),
                detail: location.to_string(),
            })
    }
}

/// Keeps every published report.
#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Mutex<Vec<(PublishTarget, CampaignReport)>>,
}

impl RecordingPublisher {
    pub fn published(&self) -> Vec<(PublishTarget, CampaignReport)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl SheetPublisher for RecordingPublisher {
    async fn publish(
        &self,
        target: &PublishTarget,
        report: &CampaignReport,
    ) -> Result<(), AppError> {
        self.published
            .lock()
            .unwrap()
            .push((target.clone(), report.clone()));
        Ok(())
    }
}

/// Members of one link: `(email, clicks)`.
pub type Members = Vec<(String, u64)>;

/// `count` distinct recipients clicking once each, plus `extra` clicks on
/// the first one.
pub fn members(prefix: &str, count: usize, extra: u64) -> Members {
    (0..count)
        .map(|i| {
            let clicks = if i == 0 { 1 + extra } else { 1 };
            (format!("{prefix}{i}@example.com"), clicks)
        })
        .collect()
}

/// One `.tar.gz` holding a result file per link.
pub fn archive(links: &[(&str, Members)]) -> Vec<u8> {
    let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

    for (index, (link_id, members)) in links.iter().enumerate() {
        let members: Vec<_> = members
            .iter()
            .map(|(email, clicks)| json!({"email_address": email, "clicks": clicks}))
            .collect();
        let body = json!([{
            "status_code": 200,
            "operation_id": link_id,
            "response": json!({"members": members, "total_items": members.len()}).to_string(),
        }])
        .to_string();

        let mut header = Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, format!("results/{index}.json"), body.as_bytes())
            .unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap()
}

/// Raw member data matching the provider's percentages on a 100 000 click,
/// 100 000 unique campaign: 23 475 / 1 021 for the first URL (split over
/// two links with overlapping recipients) and 40 020 / 2 931 for the second.
pub fn fixture_archives() -> FixtureArchives {
    FixtureArchives::default()
        .with(
            "batch-0",
            archive(&[
                ("l1", members("r", 1_021, 23_475 - 1_021 - 10)),
                ("l3", members("r", 10, 0)),
            ]),
        )
        .with("batch-1", archive(&[("l2", members("y", 2_931, 40_020 - 2_931))]))
}

pub fn instant_retries() -> RetryingCaller {
    RetryingCaller::new(Duration::ZERO, None)
}
