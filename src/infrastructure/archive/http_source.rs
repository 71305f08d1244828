//! Plain HTTP download of batch result archives.

use async_trait::async_trait;

use crate::config::Config;
use crate::domain::gateways::ArchiveSource;
use crate::error::AppError;
use crate::infrastructure::http_client_builder;

/// Downloads archives from the pre-signed `response_body_url`.
///
/// The location already carries its own authorization, so no provider
/// credentials are attached.
pub struct HttpArchiveSource {
    client: reqwest::Client,
}

impl HttpArchiveSource {
    /// Creates a source sharing the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = http_client_builder(config)
            .build()
            .map_err(|e| AppError::config(format!("archive HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ArchiveSource for HttpArchiveSource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, AppError> {
        let response = self.client.get(location).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::from_problem("archive", status.as_u16(), &body));
        }

        let bytes = response.bytes().await?;
        tracing::debug!(location, size = bytes.len(), "Downloaded batch archive");
        Ok(bytes.to_vec())
    }
}
