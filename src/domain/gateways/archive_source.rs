//! Gateway trait for downloading batch result archives.

use async_trait::async_trait;

use crate::error::AppError;

/// Fetches the raw bytes behind a batch `response_body_url`.
///
/// The bytes are a gzip-compressed tar archive; decoding lives in
/// [`crate::infrastructure::archive`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, AppError>;
}
