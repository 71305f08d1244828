//! Infrastructure layer for external integrations.
//!
//! This layer implements the gateway traits defined by the domain layer with
//! real HTTP clients.
//!
//! # Modules
//!
//! - [`mailchimp`] - Campaign provider (Mailchimp Marketing API v3)
//! - [`archive`] - Batch result download and `.tar.gz` decoding
//! - [`sheets`] - Google Sheets publisher

pub mod archive;
pub mod mailchimp;
pub mod sheets;

use std::time::Duration;

use crate::config::Config;

/// Client builder shared by every outbound integration.
///
/// Only the connect phase and individual reads are bounded. A whole-request
/// deadline must not be set: it expires first and reports connect failures
/// as plain request timeouts.
pub(crate) fn http_client_builder(config: &Config) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .user_agent(concat!("campaign-metrics/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(config.http_connect_timeout_secs))
        .read_timeout(Duration::from_secs(config.http_read_timeout_secs))
}
