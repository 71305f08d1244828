//! Application layer: the stages of a metrics run and their retry policy.
//!
//! Services consume gateway traits from [`crate::domain::gateways`] and never
//! touch HTTP directly. Each stage owns a copy of the shared
//! [`retry::RetryingCaller`].
//!
//! # Available Services
//!
//! - [`services::campaign_resolver::CampaignResolver`] - Campaign name to id
//! - [`services::click_job_submitter::ClickJobSubmitter`] - Link grouping and batch submission
//! - [`services::batch_poller::BatchPoller`] - Waiting for batch completion
//! - [`services::archive_aggregator::ArchiveAggregator`] - Archive download and member counting
//! - [`services::rate_calculator`] - Per-URL rates and ordering
//! - [`services::report_pipeline::ReportPipeline`] - The whole run, end to end

pub mod retry;
pub mod services;
