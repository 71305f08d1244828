//! # Campaign Metrics
//!
//! Per-URL click statistics for email campaigns, computed from the provider's
//! raw click records and published to Google Sheets.
//!
//! ## Architecture
//!
//! The crate keeps the same layer separation throughout:
//!
//! - **Domain Layer** ([`domain`]) - Entities and the gateway traits for the outside world
//! - **Application Layer** ([`application`]) - Pipeline stages and the retry policy
//! - **Infrastructure Layer** ([`infrastructure`]) - Mailchimp, archive download, Google Sheets
//! - **Utilities** ([`utils`]) - Calendar and time zone helpers
//!
//! ## Pipeline
//!
//! 1. Resolve the campaign by name
//! 2. Fetch campaign-wide totals and every tracked link
//! 3. Group links by destination URL and submit one batch job per URL
//! 4. Poll each job until its result archive is published
//! 5. Download and fold the archives into per-URL totals
//! 6. Divide by the campaign totals, sort, and publish
//!
//! ## Quick Start
//!
//! ```bash
//! export MAILCHIMP_API_KEY="0123456789abcdef-us16"
//! export GOOGLE_ACCESS_TOKEN="ya29...."
//!
//! cargo run -- weekly "Friday Bulletin"
//! cargo run -- report "Test1" --to-google-sheet 1AbC... --dry-run
//! ```
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

pub use error::AppError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::retry::RetryingCaller;
    pub use crate::application::services::{AggregationMode, ReportPipeline};
    pub use crate::domain::entities::{
        BatchOperation, BatchStatus, CampaignId, CampaignMatch, CampaignReport, CampaignSummary,
        TrackedLink, UrlRate,
    };
    pub use crate::domain::gateways::{
        ArchiveSource, CampaignProvider, PublishTarget, SheetPublisher,
    };
    pub use crate::error::AppError;
}
