//! Pipeline stages for the application layer.

pub mod archive_aggregator;
pub mod batch_poller;
pub mod campaign_resolver;
pub mod click_job_submitter;
pub mod rate_calculator;
pub mod report_pipeline;

pub use archive_aggregator::{ArchiveAggregator, aggregate_archive};
pub use batch_poller::BatchPoller;
pub use campaign_resolver::CampaignResolver;
pub use click_job_submitter::{ClickJobSubmitter, build_operations};
pub use rate_calculator::{compute_rates, passthrough_rates, sort_by_click_rate};
pub use report_pipeline::{AggregationMode, ReportPipeline};
