//! Gateway trait definitions for the domain layer.
//!
//! The pipeline talks to three external systems. Each one is abstracted by a
//! trait so the services in [`crate::application`] never see HTTP.
//!
//! # Architecture
//!
//! - Traits define the contract for remote operations
//! - Implementations live in `crate::infrastructure`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Gateways
//!
//! - [`CampaignProvider`] - Campaign search, reports and batch jobs
//! - [`ArchiveSource`] - Batch result download
//! - [`SheetPublisher`] - Report output
//!
//! # Testing
//!
//! See integration tests in `tests/` for hand-written fixture implementations.

pub mod archive_source;
pub mod campaign_provider;
pub mod sheet_publisher;

pub use archive_source::ArchiveSource;
pub use campaign_provider::CampaignProvider;
pub use sheet_publisher::{PublishTarget, SheetPublisher};

#[cfg(test)]
pub use archive_source::MockArchiveSource;
#[cfg(test)]
pub use campaign_provider::MockCampaignProvider;
#[cfg(test)]
pub use sheet_publisher::MockSheetPublisher;
