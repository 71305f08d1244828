//! Core domain entities representing the campaign metrics data model.
//!
//! Entities are plain data structures; the only behavior they carry is the
//! bookkeeping that keeps their invariants (link grouping, recipient
//! de-duplication, batch completion).
//!
//! # Entity Types
//!
//! - [`CampaignId`], [`CampaignMatch`], [`CampaignSummary`] - Campaign identity and totals
//! - [`LinkId`], [`TrackedLink`], [`LinkGroups`] - Tracked links grouped by destination URL
//! - [`BatchOperation`], [`BatchStatus`], [`ClickJob`] - Asynchronous member lookups
//! - [`UrlAggregate`], [`UrlTotals`], [`UrlRate`] - Per-URL aggregation results
//! - [`CampaignReport`] - The final publishable result

pub mod campaign;
pub mod click_job;
pub mod link;
pub mod report;
pub mod url_stats;

pub use campaign::{CampaignId, CampaignMatch, CampaignSummary};
pub use click_job::{BatchOperation, BatchStatus, ClickJob, MEMBERS_PAGE_SIZE, OperationParams};
pub use link::{LinkGroups, LinkId, TrackedLink, UrlGroup};
pub use report::CampaignReport;
pub use url_stats::{UrlAggregate, UrlRate, UrlTotals};
